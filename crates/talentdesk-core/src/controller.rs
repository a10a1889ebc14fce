//! Generic list controller: filter, sort, paginate, and select.
//!
//! # Design
//! - The raw collection is the single source of truth; the visible order is a
//!   list of indices recomputed after every mutating call.
//! - Selection is independent of the page window and the criteria. It only
//!   admits ids present in the collection and is pruned on every ingest.
//! - Fetches are ordered by generation tickets so a slow response can never
//!   overwrite a newer one.

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::decode::decode_collection;
use crate::filter::{FilterCriteria, FilterValue};
use crate::page::PageWindow;
use crate::record::{Listable, RecordId};
use crate::selection::SelectionSet;
use crate::sort::{SortSpec, sort_indices};

/// Generation marker returned by [`ListController::begin_fetch`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTicket(u64);

impl FetchTicket {
    /// Raw generation number.
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.0
    }
}

/// Result of handing a fetched payload to the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The payload was the latest issued fetch and replaced the collection.
    Applied {
        /// Number of records ingested.
        records: usize,
    },
    /// A newer fetch was issued meanwhile; the payload was discarded.
    Stale,
}

/// A record taken out of the collection, with what is needed to put it back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Removed<T> {
    /// Position the record occupied in the raw collection.
    pub index: usize,
    /// Whether the record was selected when removed.
    pub was_selected: bool,
    /// The removed record.
    pub record: T,
}

/// Snapshot of what a list screen renders.
#[derive(Debug, PartialEq)]
pub struct DerivedView<'a, T> {
    /// Records on the current page, in filtered and sorted order.
    pub rows: Vec<&'a T>,
    /// Current 1-based page.
    pub page_index: usize,
    /// Rows per page.
    pub page_size: usize,
    /// Number of pages for the filtered view.
    pub page_count: usize,
    /// Records matching every active criterion.
    pub total_matching: usize,
    /// Records in the raw collection.
    pub total_records: usize,
    /// Number of selected ids across all pages.
    pub selected_count: usize,
    /// Whether every row on the current page is selected.
    pub is_all_on_page_selected: bool,
}

/// Client-side list state for one screen.
#[derive(Clone, Debug)]
pub struct ListController<T> {
    records: Vec<T>,
    criteria: FilterCriteria,
    sort: Option<SortSpec>,
    window: PageWindow,
    selection: SelectionSet,
    visible: Vec<usize>,
    latest_fetch: u64,
}

impl<T: Listable> Default for ListController<T> {
    fn default() -> Self {
        Self::new(PageWindow::default().page_size())
    }
}

impl<T: Listable> ListController<T> {
    /// Empty controller with the given page size.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            records: Vec::new(),
            criteria: FilterCriteria::default(),
            sort: None,
            window: PageWindow::new(page_size),
            selection: SelectionSet::new(),
            visible: Vec::new(),
            latest_fetch: 0,
        }
    }

    /// Decode and ingest a raw list payload.
    ///
    /// Never fails: a payload that is not a list degrades to an empty
    /// collection, and entries that do not decode are skipped. Returns the
    /// number of records ingested.
    pub fn ingest(&mut self, payload: &Value) -> usize
    where
        T: DeserializeOwned,
    {
        let rows = match decode_collection::<T>(payload) {
            Ok(decoded) => decoded.records,
            Err(err) => {
                warn!(error = ?err, "list payload is not a collection; showing empty list");
                Vec::new()
            }
        };
        self.ingest_rows(rows)
    }

    /// Replace the collection with already-typed rows.
    ///
    /// Criteria, sort, and page size are kept; the page is re-clamped and
    /// selected ids no longer present are dropped.
    pub fn ingest_rows(&mut self, rows: Vec<T>) -> usize {
        let mut seen = HashSet::with_capacity(rows.len());
        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            if seen.insert(row.id().clone()) {
                records.push(row);
            } else {
                warn!(id = %row.id(), "dropping record with duplicate id");
            }
        }
        self.records = records;
        let purged = self.selection.retain(|id| seen.contains(id));
        if purged > 0 {
            debug!(purged, "pruned stale selection after ingest");
        }
        self.recompute();
        self.records.len()
    }

    /// Issue a new fetch generation; older tickets become stale.
    pub const fn begin_fetch(&mut self) -> FetchTicket {
        self.latest_fetch += 1;
        FetchTicket(self.latest_fetch)
    }

    /// Whether `ticket` is the most recently issued fetch.
    #[must_use]
    pub const fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.latest_fetch
    }

    /// Ingest a fetched payload if its ticket is still current.
    pub fn ingest_fetched(&mut self, ticket: FetchTicket, payload: &Value) -> FetchOutcome
    where
        T: DeserializeOwned,
    {
        if !self.is_current(ticket) {
            debug!(generation = ticket.0, latest = self.latest_fetch, "discarding stale fetch");
            return FetchOutcome::Stale;
        }
        FetchOutcome::Applied {
            records: self.ingest(payload),
        }
    }

    /// Typed variant of [`Self::ingest_fetched`].
    pub fn ingest_fetched_rows(&mut self, ticket: FetchTicket, rows: Vec<T>) -> FetchOutcome {
        if !self.is_current(ticket) {
            debug!(generation = ticket.0, latest = self.latest_fetch, "discarding stale fetch");
            return FetchOutcome::Stale;
        }
        FetchOutcome::Applied {
            records: self.ingest_rows(rows),
        }
    }

    /// Record a failed fetch: the collection empties if `ticket` is current.
    ///
    /// The selection is kept as is; the next successful ingest prunes it.
    pub fn fail_fetch(&mut self, ticket: FetchTicket) -> FetchOutcome {
        if !self.is_current(ticket) {
            debug!(generation = ticket.0, latest = self.latest_fetch, "discarding stale fetch");
            return FetchOutcome::Stale;
        }
        self.records.clear();
        self.recompute();
        FetchOutcome::Applied { records: 0 }
    }

    /// Set one criterion and return to page 1.
    pub fn set_filter(&mut self, key: impl Into<String>, value: FilterValue) {
        self.criteria.set(key, value);
        self.window.reset();
        self.recompute();
    }

    /// Remove one criterion and return to page 1.
    pub fn clear_filter(&mut self, key: &str) {
        self.criteria.remove(key);
        self.window.reset();
        self.recompute();
    }

    /// Remove every criterion and return to page 1.
    pub fn clear_filters(&mut self) {
        self.criteria.clear();
        self.window.reset();
        self.recompute();
    }

    /// Sort by `key`; picking the active key again flips the direction.
    ///
    /// The page index is kept.
    pub fn set_sort(&mut self, key: &str) {
        self.sort = Some(SortSpec::next(self.sort.as_ref(), key));
        self.recompute();
    }

    /// Install an explicit sort spec.
    pub fn set_sort_spec(&mut self, spec: SortSpec) {
        self.sort = Some(spec);
        self.recompute();
    }

    /// Return to insertion order.
    pub fn clear_sort(&mut self) {
        self.sort = None;
        self.recompute();
    }

    /// Move to `index`, clamped to the available pages.
    pub fn set_page(&mut self, index: usize) {
        self.window.set_page(index, self.visible.len());
    }

    /// Change the page size (minimum 1) and return to page 1.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.window.set_page_size(page_size);
        self.window.clamp_to(self.visible.len());
    }

    /// Toggle one id. Ids not in the collection are ignored.
    ///
    /// Returns whether the id is selected afterwards.
    pub fn toggle_select_one(&mut self, id: &RecordId) -> bool {
        if self.position(id).is_none() {
            debug!(%id, "ignoring selection of unknown id");
            return false;
        }
        self.selection.toggle(id)
    }

    /// Select the current page, or deselect it when it is already fully selected.
    ///
    /// Returns whether the page ended up selected.
    pub fn toggle_select_all_on_page(&mut self) -> bool {
        let page = self.page_ids();
        self.selection.toggle_page(&page)
    }

    /// Select every record matching the criteria, across all pages.
    ///
    /// Returns the number of selected ids afterwards.
    pub fn select_all_matching(&mut self) -> usize {
        let ids: Vec<RecordId> = self
            .visible
            .iter()
            .filter_map(|index| self.records.get(*index))
            .map(|record| record.id().clone())
            .collect();
        self.selection.extend(ids);
        self.selection.len()
    }

    /// Empty the selection.
    pub fn clear(&mut self) {
        self.selection.clear();
    }

    /// Current selection.
    #[must_use]
    pub const fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Selected ids in order.
    #[must_use]
    pub fn selected_ids(&self) -> Vec<RecordId> {
        self.selection.to_vec()
    }

    /// Raw collection in ingest order.
    #[must_use]
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Active criteria.
    #[must_use]
    pub const fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Active sort, if any.
    #[must_use]
    pub const fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    /// Current page window.
    #[must_use]
    pub const fn window(&self) -> PageWindow {
        self.window
    }

    /// Filtered and sorted records across all pages.
    pub fn matching(&self) -> impl Iterator<Item = &T> {
        self.visible
            .iter()
            .filter_map(|index| self.records.get(*index))
    }

    /// Ids shown on the current page.
    #[must_use]
    pub fn page_ids(&self) -> Vec<RecordId> {
        self.page_slice()
            .iter()
            .filter_map(|index| self.records.get(*index))
            .map(|record| record.id().clone())
            .collect()
    }

    /// What the screen should render right now.
    #[must_use]
    pub fn derived_view(&self) -> DerivedView<'_, T> {
        let rows: Vec<&T> = self
            .page_slice()
            .iter()
            .filter_map(|index| self.records.get(*index))
            .collect();
        let is_all_on_page_selected =
            !rows.is_empty() && rows.iter().all(|row| self.selection.contains(row.id()));
        let total_matching = self.visible.len();
        DerivedView {
            rows,
            page_index: self.window.page_index(),
            page_size: self.window.page_size(),
            page_count: self.window.page_count(total_matching),
            total_matching,
            total_records: self.records.len(),
            selected_count: self.selection.len(),
            is_all_on_page_selected,
        }
    }

    /// Look up a record by id.
    #[must_use]
    pub fn record(&self, id: &RecordId) -> Option<&T> {
        self.position(id).and_then(|index| self.records.get(index))
    }

    /// Edit a record in place; returns the pre-edit snapshot.
    ///
    /// The closure must not change the record's id.
    pub fn apply_patch(&mut self, id: &RecordId, patch: impl FnOnce(&mut T)) -> Option<T> {
        let index = self.position(id)?;
        let record = self.records.get_mut(index)?;
        let snapshot = record.clone();
        patch(record);
        self.recompute();
        Some(snapshot)
    }

    /// Swap in a new version of a record; returns the previous version.
    pub fn replace(&mut self, id: &RecordId, next: T) -> Option<T> {
        let index = self.position(id)?;
        let slot = self.records.get_mut(index)?;
        let previous = std::mem::replace(slot, next);
        self.recompute();
        Some(previous)
    }

    /// Take a record out of the collection and the selection.
    pub fn remove(&mut self, id: &RecordId) -> Option<Removed<T>> {
        let index = self.position(id)?;
        let removed = self.take_at(index);
        self.recompute();
        removed
    }

    /// Take several records out at once.
    ///
    /// The result is ordered by original position so it can be handed back to
    /// [`Self::restore_many`] unchanged. Unknown ids are skipped.
    pub fn remove_many(&mut self, ids: &[RecordId]) -> Vec<Removed<T>> {
        let wanted: HashSet<&RecordId> = ids.iter().collect();
        let positions: Vec<usize> = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, record)| wanted.contains(record.id()))
            .map(|(index, _)| index)
            .collect();
        let mut removed: Vec<Removed<T>> = positions
            .into_iter()
            .rev()
            .filter_map(|index| self.take_at(index))
            .collect();
        removed.reverse();
        self.recompute();
        removed
    }

    /// Put a removed record back at its original position.
    ///
    /// Skipped when a record with the same id has reappeared meanwhile (for
    /// example through a refetch). Returns whether the record was re-inserted.
    pub fn restore(&mut self, removed: Removed<T>) -> bool {
        let restored = self.insert_removed(removed);
        self.recompute();
        restored
    }

    /// Put a batch from [`Self::remove_many`] back; returns how many were re-inserted.
    pub fn restore_many(&mut self, mut removed: Vec<Removed<T>>) -> usize {
        removed.sort_by_key(|entry| entry.index);
        let restored = removed
            .into_iter()
            .map(|entry| self.insert_removed(entry))
            .filter(|restored| *restored)
            .count();
        self.recompute();
        restored
    }

    fn position(&self, id: &RecordId) -> Option<usize> {
        self.records.iter().position(|record| record.id() == id)
    }

    fn take_at(&mut self, index: usize) -> Option<Removed<T>> {
        if index >= self.records.len() {
            return None;
        }
        let record = self.records.remove(index);
        let was_selected = self.selection.retain(|id| id != record.id()) > 0;
        Some(Removed {
            index,
            was_selected,
            record,
        })
    }

    fn insert_removed(&mut self, removed: Removed<T>) -> bool {
        let Removed {
            index,
            was_selected,
            record,
        } = removed;
        if self.position(record.id()).is_some() {
            debug!(id = %record.id(), "record already present; skipping restore");
            return false;
        }
        if was_selected {
            self.selection.extend([record.id().clone()]);
        }
        let index = index.min(self.records.len());
        self.records.insert(index, record);
        true
    }

    fn page_slice(&self) -> &[usize] {
        self.visible
            .get(self.window.bounds(self.visible.len()))
            .unwrap_or(&[])
    }

    fn recompute(&mut self) {
        let matcher = self.criteria.matcher();
        let mut visible: Vec<usize> = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, record)| matcher.matches(*record))
            .map(|(index, _)| index)
            .collect();
        if let Some(spec) = &self.sort {
            sort_indices(&self.records, &mut visible, spec);
        }
        self.visible = visible;
        self.window.clamp_to(self.visible.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::SEARCH_KEY;
    use crate::record::FieldValue;
    use crate::sort::SortDirection;
    use serde::Deserialize;
    use serde_json::json;
    use std::borrow::Cow;

    #[derive(Clone, Debug, PartialEq, Deserialize)]
    struct Row {
        id: RecordId,
        name: String,
        #[serde(default)]
        skill: Vec<String>,
        #[serde(default)]
        score: Option<f64>,
    }

    impl Listable for Row {
        fn id(&self) -> &RecordId {
            &self.id
        }

        fn searchable_text(&self) -> Vec<Cow<'_, str>> {
            let mut text = vec![Cow::Borrowed(self.name.as_str())];
            text.extend(self.skill.iter().map(|skill| Cow::Borrowed(skill.as_str())));
            text
        }

        fn field(&self, key: &str) -> Option<FieldValue> {
            match key {
                "name" => FieldValue::text(self.name.clone()),
                "score" => self.score.and_then(FieldValue::number),
                _ => None,
            }
        }
    }

    fn row(id: i64, name: &str) -> Row {
        Row {
            id: RecordId::from(id),
            name: name.to_string(),
            skill: Vec::new(),
            score: None,
        }
    }

    fn numbered(count: i64) -> Vec<Row> {
        (1..=count).map(|id| row(id, &format!("row {id:02}"))).collect()
    }

    fn names<'a>(view: &DerivedView<'a, Row>) -> Vec<&'a str> {
        view.rows.iter().map(|row| row.name.as_str()).collect()
    }

    #[test]
    fn search_matches_names_and_skills() {
        let mut list = ListController::<Row>::new(10);
        list.ingest(&json!([
            { "id": 1, "name": "Bob", "skill": ["Go"] },
            { "id": 2, "name": "Ann", "skill": ["Rust"] }
        ]));
        list.set_filter(SEARCH_KEY, FilterValue::search("ann"));
        let view = list.derived_view();
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].id, RecordId::from(2));

        list.set_filter(SEARCH_KEY, FilterValue::search("GO"));
        assert_eq!(names(&list.derived_view()), vec!["Bob"]);
    }

    #[test]
    fn applying_the_same_filter_twice_is_idempotent() {
        let mut list = ListController::new(5);
        list.ingest_rows(numbered(12));
        list.set_filter(SEARCH_KEY, FilterValue::search("1"));
        let once: Vec<RecordId> = list.matching().map(|row| row.id.clone()).collect();
        list.set_filter(SEARCH_KEY, FilterValue::search("1"));
        let twice: Vec<RecordId> = list.matching().map(|row| row.id.clone()).collect();
        assert_eq!(once, twice);
        assert_eq!(once.len(), 4);
    }

    #[test]
    fn selection_survives_page_navigation() {
        let mut list = ListController::new(10);
        list.ingest_rows(numbered(23));
        assert!(list.toggle_select_one(&RecordId::from(3)));
        list.set_page(2);
        let view = list.derived_view();
        assert_eq!(view.page_index, 2);
        assert!(!view.is_all_on_page_selected);
        assert!(list.selection().contains(&RecordId::from(3)));
    }

    #[test]
    fn filtered_out_records_stay_selected() {
        let mut list = ListController::new(10);
        list.ingest_rows(numbered(3));
        list.toggle_select_one(&RecordId::from(1));
        list.set_filter(SEARCH_KEY, FilterValue::search("row 02"));
        assert_eq!(list.derived_view().selected_count, 1);
        assert!(list.selection().contains(&RecordId::from(1)));
    }

    #[test]
    fn ingest_purges_stale_selection() {
        let mut list = ListController::new(10);
        list.ingest_rows(numbered(3));
        list.toggle_select_one(&RecordId::from(1));
        list.toggle_select_one(&RecordId::from(2));
        list.ingest_rows(vec![row(2, "two"), row(4, "four")]);
        assert_eq!(list.selected_ids(), vec![RecordId::from(2)]);
    }

    #[test]
    fn unknown_ids_are_not_selectable() {
        let mut list = ListController::new(10);
        list.ingest_rows(numbered(2));
        assert!(!list.toggle_select_one(&RecordId::from(99)));
        assert!(list.selection().is_empty());
    }

    #[test]
    fn sorting_same_key_twice_reverses_order() {
        let mut list = ListController::new(10);
        list.ingest_rows(vec![row(1, "Cara"), row(2, "Abe"), row(3, "Ben")]);
        list.set_sort("name");
        let ascending = names(&list.derived_view())
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        assert_eq!(ascending, vec!["Abe", "Ben", "Cara"]);
        list.set_sort("name");
        assert_eq!(list.sort().map(|spec| spec.direction), Some(SortDirection::Descending));
        let mut descending = names(&list.derived_view())
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        descending.reverse();
        assert_eq!(descending, ascending);
        list.clear_sort();
        assert_eq!(names(&list.derived_view()), vec!["Cara", "Abe", "Ben"]);
    }

    #[test]
    fn missing_sort_values_go_last() {
        let mut list = ListController::new(10);
        let mut scored = row(2, "scored");
        scored.score = Some(5.0);
        let mut low = row(3, "low");
        low.score = Some(1.0);
        list.ingest_rows(vec![row(1, "blank"), scored, low]);
        list.set_sort("score");
        assert_eq!(names(&list.derived_view()), vec!["low", "scored", "blank"]);
        list.set_sort("score");
        assert_eq!(names(&list.derived_view()), vec!["scored", "low", "blank"]);
    }

    #[test]
    fn pagination_clamps_requested_page() {
        let mut list = ListController::new(10);
        list.ingest_rows(numbered(23));
        let view = list.derived_view();
        assert_eq!(view.page_count, 3);
        list.set_page(99);
        let view = list.derived_view();
        assert_eq!(view.page_index, 3);
        assert_eq!(view.rows.len(), 3);
    }

    #[test]
    fn shrinking_ingest_reclamps_page() {
        let mut list = ListController::new(10);
        list.ingest_rows(numbered(23));
        list.set_page(3);
        list.ingest_rows(numbered(4));
        let view = list.derived_view();
        assert_eq!(view.page_index, 1);
        assert_eq!(view.rows.len(), 4);
    }

    #[test]
    fn filter_resets_page_but_sort_keeps_it() {
        let mut list = ListController::new(10);
        list.ingest_rows(numbered(23));
        list.set_page(2);
        list.set_sort("name");
        assert_eq!(list.window().page_index(), 2);
        list.set_filter(SEARCH_KEY, FilterValue::search("row"));
        assert_eq!(list.window().page_index(), 1);
    }

    #[test]
    fn page_size_change_returns_to_first_page() {
        let mut list = ListController::new(10);
        list.ingest_rows(numbered(23));
        list.set_page(3);
        list.set_page_size(0);
        let view = list.derived_view();
        assert_eq!(view.page_size, 1);
        assert_eq!(view.page_index, 1);
        assert_eq!(view.page_count, 23);
    }

    #[test]
    fn non_array_payload_ingests_as_empty() {
        let mut list = ListController::<Row>::new(10);
        list.ingest_rows(numbered(3));
        assert_eq!(list.ingest(&json!({ "error": "fail" })), 0);
        let view = list.derived_view();
        assert!(view.rows.is_empty());
        assert_eq!(view.page_index, 1);
        assert_eq!(view.page_count, 0);
    }

    #[test]
    fn malformed_entries_and_duplicates_are_dropped() {
        let mut list = ListController::<Row>::new(10);
        let count = list.ingest(&json!({ "result": [
            { "id": 1, "name": "first" },
            { "id": 1, "name": "again" },
            { "name": "no id" },
            { "id": "a-2", "name": "text id" }
        ]}));
        assert_eq!(count, 2);
        assert_eq!(list.record(&RecordId::from(1)).map(|row| row.name.as_str()), Some("first"));
        assert!(list.record(&RecordId::from("a-2")).is_some());
    }

    #[test]
    fn page_toggle_only_touches_current_page() {
        let mut list = ListController::new(2);
        list.ingest_rows(numbered(5));
        list.toggle_select_one(&RecordId::from(5));
        assert!(list.toggle_select_all_on_page());
        assert!(list.derived_view().is_all_on_page_selected);
        assert_eq!(list.selection().len(), 3);
        assert!(!list.toggle_select_all_on_page());
        assert_eq!(list.selected_ids(), vec![RecordId::from(5)]);
    }

    #[test]
    fn select_all_matching_spans_pages() {
        let mut list = ListController::new(2);
        list.ingest_rows(numbered(12));
        list.set_filter(SEARCH_KEY, FilterValue::search("row 1"));
        assert_eq!(list.select_all_matching(), 3);
        list.clear();
        assert!(list.selection().is_empty());
    }

    #[test]
    fn stale_fetch_tickets_are_discarded() {
        let mut list = ListController::<Row>::new(10);
        let first = list.begin_fetch();
        let second = list.begin_fetch();
        assert_eq!(
            list.ingest_fetched(second, &json!([{ "id": 2, "name": "new" }])),
            FetchOutcome::Applied { records: 1 }
        );
        assert_eq!(
            list.ingest_fetched(first, &json!([{ "id": 1, "name": "old" }])),
            FetchOutcome::Stale
        );
        assert!(list.record(&RecordId::from(2)).is_some());
        assert!(list.record(&RecordId::from(1)).is_none());
        assert!(first.generation() < second.generation());
    }

    #[test]
    fn removed_records_restore_at_original_position() {
        let mut list = ListController::new(10);
        list.ingest_rows(numbered(4));
        list.toggle_select_one(&RecordId::from(2));
        let removed = list.remove(&RecordId::from(2)).unwrap();
        assert_eq!(removed.index, 1);
        assert!(removed.was_selected);
        assert!(list.selection().is_empty());
        assert!(list.restore(removed));
        let ids: Vec<RecordId> = list.records().iter().map(|row| row.id.clone()).collect();
        assert_eq!(ids, numbered(4).into_iter().map(|row| row.id).collect::<Vec<_>>());
        assert!(list.selection().contains(&RecordId::from(2)));
    }

    #[test]
    fn batch_removal_round_trips_positions() {
        let mut list = ListController::new(10);
        let original = numbered(6);
        list.ingest_rows(original.clone());
        let removed = list.remove_many(&[RecordId::from(5), RecordId::from(2), RecordId::from(9)]);
        assert_eq!(removed.iter().map(|entry| entry.index).collect::<Vec<_>>(), vec![1, 4]);
        assert_eq!(list.records().len(), 4);
        assert_eq!(list.restore_many(removed), 2);
        assert_eq!(list.records(), original.as_slice());
    }

    #[test]
    fn restore_skips_records_that_reappeared() {
        let mut list = ListController::new(10);
        list.ingest_rows(numbered(2));
        let removed = list.remove(&RecordId::from(1)).unwrap();
        list.ingest_rows(numbered(2));
        assert!(!list.restore(removed));
        assert_eq!(list.records().len(), 2);
    }

    #[test]
    fn patches_return_the_previous_snapshot() {
        let mut list = ListController::new(10);
        list.ingest_rows(numbered(2));
        let before = list
            .apply_patch(&RecordId::from(1), |row| row.name = "renamed".into())
            .unwrap();
        assert_eq!(before.name, "row 01");
        let patched = list.replace(&RecordId::from(1), before).unwrap();
        assert_eq!(patched.name, "renamed");
        assert_eq!(list.record(&RecordId::from(1)).unwrap().name, "row 01");
        assert!(list.replace(&RecordId::from(9), row(9, "x")).is_none());
    }

    #[test]
    fn failed_fetch_empties_rows_but_keeps_selection() {
        let mut list = ListController::new(5);
        list.ingest_rows(numbered(12));
        list.toggle_select_one(&RecordId::from(2));
        list.toggle_select_one(&RecordId::from(11));

        let ticket = list.begin_fetch();
        assert_eq!(list.fail_fetch(ticket), FetchOutcome::Applied { records: 0 });
        assert!(list.records().is_empty());
        assert_eq!(list.derived_view().total_matching, 0);
        assert_eq!(
            list.selected_ids(),
            vec![RecordId::from(2), RecordId::from(11)]
        );

        let ticket = list.begin_fetch();
        list.ingest_fetched_rows(ticket, numbered(10));
        assert_eq!(list.selected_ids(), vec![RecordId::from(2)]);
    }

    #[test]
    fn stale_failed_fetch_leaves_rows_alone() {
        let mut list = ListController::new(5);
        let stale = list.begin_fetch();
        let current = list.begin_fetch();
        list.ingest_fetched_rows(current, numbered(3));
        assert_eq!(list.fail_fetch(stale), FetchOutcome::Stale);
        assert_eq!(list.records().len(), 3);
    }
}
