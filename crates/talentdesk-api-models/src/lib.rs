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
//! Typed DTOs for the Talentdesk admin REST API.
//!
//! Every managed record type implements [`talentdesk_core::Listable`] and
//! [`talentdesk_core::Entity`] so one controller and one dispatcher serve all
//! screens. Loosely shaped fields (stringified JSON, mixed number/string ids)
//! are decoded through tagged steps in [`fields`].

pub mod app_user;
pub mod candidate;
pub mod error_body;
pub mod fields;
pub mod page;
pub mod reseller;
pub mod upload;
pub mod upload_log;

pub use app_user::AppUser;
pub use candidate::Candidate;
pub use error_body::ApiErrorBody;
pub use fields::{Address, Education, decode_json_field, parse_address, parse_education};
pub use page::Page;
pub use reseller::Reseller;
pub use upload::{UploadFileResult, UploadMetadata, UploadReport, decode_upload_results};
pub use upload_log::UploadLog;

use talentdesk_core::FieldValue;

/// Text field helper shared by the entity `field` accessors.
pub(crate) fn text_field(value: Option<&str>) -> Option<FieldValue> {
    value.and_then(FieldValue::text)
}

/// Timestamp field helper shared by the entity `field` accessors.
pub(crate) fn timestamp_field(value: Option<&str>) -> Option<FieldValue> {
    value.and_then(FieldValue::timestamp)
}
