//! Client-side page window.

use std::ops::Range;

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// 1-based page index plus page size.
///
/// The index is kept within `1..=max(page_count, 1)` by every mutator; callers
/// never observe an out-of-range page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageWindow {
    page_index: usize,
    page_size: usize,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PageWindow {
    /// Window on page 1; a zero size is raised to 1.
    #[must_use]
    pub const fn new(page_size: usize) -> Self {
        Self {
            page_index: 1,
            page_size: if page_size == 0 { 1 } else { page_size },
        }
    }

    /// Current 1-based page.
    #[must_use]
    pub const fn page_index(&self) -> usize {
        self.page_index
    }

    /// Rows per page.
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages needed for `total` rows.
    #[must_use]
    pub const fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size)
    }

    /// Move to `index`, clamped to the valid range for `total` rows.
    pub fn set_page(&mut self, index: usize, total: usize) {
        let last = self.page_count(total).max(1);
        self.page_index = index.clamp(1, last);
    }

    /// Re-clamp the current page after the row count changed.
    pub fn clamp_to(&mut self, total: usize) {
        self.set_page(self.page_index, total);
    }

    /// Return to page 1.
    pub const fn reset(&mut self) {
        self.page_index = 1;
    }

    /// Change the page size and return to page 1.
    pub const fn set_page_size(&mut self, page_size: usize) {
        self.page_size = if page_size == 0 { 1 } else { page_size };
        self.reset();
    }

    /// Row range covered by the current page.
    #[must_use]
    pub fn bounds(&self, total: usize) -> Range<usize> {
        let start = self
            .page_index
            .saturating_sub(1)
            .saturating_mul(self.page_size)
            .min(total);
        let end = start.saturating_add(self.page_size).min(total);
        start..end
    }
}
