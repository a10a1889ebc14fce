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

//! Client-side list state shared by every Talentdesk screen.
//!
//! Layout: `record.rs` (identity + field accessors), `decode.rs` (payload
//! envelopes and tagged decode steps), `filter.rs`, `sort.rs`, `page.rs`,
//! `selection.rs`, and `controller.rs` (`ListController` tying them together).

pub mod controller;
pub mod decode;
pub mod filter;
pub mod page;
pub mod record;
pub mod selection;
pub mod sort;

pub use controller::{DerivedView, FetchOutcome, FetchTicket, ListController, Removed};
pub use decode::{
    DecodeError, DecodedCollection, collection_items, decode_collection, decode_json_str,
    record_item,
};
pub use filter::{FilterCriteria, FilterValue, SEARCH_KEY};
pub use page::{DEFAULT_PAGE_SIZE, PageWindow};
pub use record::{Entity, FieldValue, Listable, RecordId, parse_timestamp_ms};
pub use selection::SelectionSet;
pub use sort::{SortDirection, SortSpec};
