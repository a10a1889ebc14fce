#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Layered client configuration and persisted session state.
//!
//! Layout: `model.rs` (typed settings and layers), `validate.rs` (parsing and
//! bounds checks), `loader.rs` (file, environment, and flag layering),
//! `session.rs` (token + profile persisted between CLI runs).

mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod session;
pub mod validate;

pub use defaults::{
    DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS, ENV_API_URL, ENV_CONFIG, ENV_PAGE_SIZE,
    ENV_SESSION_PATH, ENV_TIMEOUT_SECS,
};
pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, load_config};
pub use model::{ClientConfig, SettingsLayer};
pub use session::{AuthState, SessionStore, StoredSession, UserProfile};
pub use validate::{parse_base_url, validate_page_size, validate_timeout_secs};
