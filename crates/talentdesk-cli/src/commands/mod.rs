//! Command handlers grouped by concern.

pub(crate) mod list;
pub(crate) mod mutate;
pub(crate) mod session;
pub(crate) mod upload;
