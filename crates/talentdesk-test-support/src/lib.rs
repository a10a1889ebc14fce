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

//! Shared test helpers used across integration suites.
//! Layout: mocks.rs (scripted transport), fixtures.rs (sample records and a dispatcher harness).

pub mod fixtures;
pub mod mocks;

pub use fixtures::{Harness, bob_and_ann, candidate, candidates, result_payload};
pub use mocks::{Call, ListReply, MockTransport, Operation};
