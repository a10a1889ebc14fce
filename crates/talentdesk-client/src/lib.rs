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

//! REST transport and row actions for Talentdesk list screens.
//!
//! Layout: `transport.rs` (async seam over the REST contract), `http.rs`
//! (`reqwest` implementation), `dispatcher.rs` (optimistic mutations with
//! revert), `scope.rs` (view-bound fetch cancellation), `notice.rs`
//! (user-facing outcome messages), `error.rs`.

pub mod dispatcher;
pub mod error;
pub mod http;
pub mod notice;
pub mod scope;
pub mod transport;

pub use dispatcher::{
    ActionResult, MutationState, RefreshOutcome, RowActionDispatcher, SharedList, merge_patch,
    shared_list,
};
pub use error::{ActionError, ClientError};
pub use http::HttpTransport;
pub use notice::{Notice, NoticeKind, NoticeLog, NoticeSink};
pub use scope::ViewScope;
pub use transport::{Transport, UploadFile, UploadRequest};
