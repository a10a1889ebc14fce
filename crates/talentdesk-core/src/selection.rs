//! Bulk-selection set kept independently of pagination and filtering.

use std::collections::BTreeSet;
use std::collections::btree_set::Iter;

use crate::record::RecordId;

/// Record ids marked for a bulk action.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<RecordId>,
}

impl SelectionSet {
    /// Empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` is selected.
    #[must_use]
    pub fn contains(&self, id: &RecordId) -> bool {
        self.ids.contains(id)
    }

    /// Number of selected ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterate selected ids in order.
    pub fn iter(&self) -> Iter<'_, RecordId> {
        self.ids.iter()
    }

    /// Selected ids as an owned list.
    #[must_use]
    pub fn to_vec(&self) -> Vec<RecordId> {
        self.ids.iter().cloned().collect()
    }

    /// Flip `id`; returns whether it is selected afterwards.
    pub fn toggle(&mut self, id: &RecordId) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.clone());
            true
        }
    }

    /// Select all `page` ids unless every one is already selected, in which
    /// case deselect only those ids. Returns whether the page ended selected.
    pub fn toggle_page(&mut self, page: &[RecordId]) -> bool {
        if page.is_empty() {
            return false;
        }
        if self.covers(page) {
            for id in page {
                self.ids.remove(id);
            }
            false
        } else {
            self.ids.extend(page.iter().cloned());
            true
        }
    }

    /// Whether every id in `ids` is selected (false for an empty slice).
    #[must_use]
    pub fn covers(&self, ids: &[RecordId]) -> bool {
        !ids.is_empty() && ids.iter().all(|id| self.ids.contains(id))
    }

    /// Add ids to the selection.
    pub fn extend(&mut self, ids: impl IntoIterator<Item = RecordId>) {
        self.ids.extend(ids);
    }

    /// Keep only ids accepted by `keep`; returns how many were dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(&RecordId) -> bool) -> usize {
        let before = self.ids.len();
        self.ids.retain(|id| keep(id));
        before - self.ids.len()
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

impl FromIterator<RecordId> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = RecordId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SelectionSet {
    type Item = &'a RecordId;
    type IntoIter = Iter<'a, RecordId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}
