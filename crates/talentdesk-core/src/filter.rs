//! Multi-criteria filtering over listable records.
//!
//! # Design
//! - A record matches when it satisfies every non-empty criterion (logical AND).
//! - Empty criteria are dropped on insert so they can never exclude a record.
//! - Search needles are lower-cased once per recompute, not once per record.

use std::collections::BTreeMap;

use crate::record::{FieldValue, Listable, parse_timestamp_ms};

/// Conventional key for the free-text search box.
pub const SEARCH_KEY: &str = "search";

/// One filter criterion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterValue {
    /// Case-insensitive substring match against the record's searchable fields.
    Search(String),
    /// Case-insensitive equality against the field named by the criterion key.
    Exact(String),
    /// Inclusive epoch-millisecond bounds against a timestamp field.
    Range {
        /// Lower bound, open when `None`.
        from: Option<i64>,
        /// Upper bound, open when `None`.
        to: Option<i64>,
    },
}

impl FilterValue {
    /// Free-text search criterion.
    #[must_use]
    pub fn search(term: impl Into<String>) -> Self {
        Self::Search(term.into())
    }

    /// Exact-match criterion.
    #[must_use]
    pub fn exact(value: impl Into<String>) -> Self {
        Self::Exact(value.into())
    }

    /// Date range criterion from optional epoch-millisecond bounds.
    #[must_use]
    pub const fn between(from: Option<i64>, to: Option<i64>) -> Self {
        Self::Range { from, to }
    }

    /// Whether the criterion is unset and therefore matches everything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Search(term) | Self::Exact(term) => term.trim().is_empty(),
            Self::Range { from, to } => from.is_none() && to.is_none(),
        }
    }
}

/// Active filter criteria keyed by filter name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    entries: BTreeMap<String, FilterValue>,
}

impl FilterCriteria {
    /// Set one criterion; an empty value removes the key instead.
    pub fn set(&mut self, key: impl Into<String>, value: FilterValue) {
        let key = key.into();
        if value.is_empty() {
            self.entries.remove(&key);
        } else {
            self.entries.insert(key, value);
        }
    }

    /// Remove one criterion, returning whether it was present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Remove every criterion.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Look up a criterion by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.entries.get(key)
    }

    /// Whether no criteria are active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate criteria in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Prepare a matcher for evaluating many records against these criteria.
    #[must_use]
    pub fn matcher(&self) -> Matcher<'_> {
        let checks = self
            .entries
            .iter()
            .map(|(key, value)| match value {
                FilterValue::Search(term) => Check::Search(term.trim().to_lowercase()),
                FilterValue::Exact(expected) => Check::Exact {
                    key,
                    expected: expected.trim().to_lowercase(),
                },
                FilterValue::Range { from, to } => Check::Range {
                    key,
                    from: *from,
                    to: *to,
                },
            })
            .collect();
        Matcher { checks }
    }

    /// Whether a single record satisfies every criterion.
    #[must_use]
    pub fn matches<T: Listable>(&self, record: &T) -> bool {
        self.matcher().matches(record)
    }
}

enum Check<'a> {
    Search(String),
    Exact {
        key: &'a str,
        expected: String,
    },
    Range {
        key: &'a str,
        from: Option<i64>,
        to: Option<i64>,
    },
}

/// Criteria prepared for repeated evaluation.
pub struct Matcher<'a> {
    checks: Vec<Check<'a>>,
}

impl Matcher<'_> {
    /// Whether the record satisfies every prepared criterion.
    #[must_use]
    pub fn matches<T: Listable>(&self, record: &T) -> bool {
        self.checks.iter().all(|check| match check {
            Check::Search(needle) => record
                .searchable_text()
                .iter()
                .any(|text| text.to_lowercase().contains(needle.as_str())),
            Check::Exact { key, expected } => {
                record.field(key).is_some_and(|value| exact_match(&value, expected))
            }
            Check::Range { key, from, to } => match record.field(key) {
                Some(FieldValue::Timestamp(at)) => {
                    from.is_none_or(|bound| at >= bound) && to.is_none_or(|bound| at <= bound)
                }
                _ => false,
            },
        })
    }
}

fn exact_match(value: &FieldValue, expected: &str) -> bool {
    match value {
        FieldValue::Text(text) => text.trim().to_lowercase() == expected,
        FieldValue::Number(number) => expected
            .parse::<f64>()
            .is_ok_and(|parsed| parsed.total_cmp(number).is_eq()),
        FieldValue::Timestamp(at) => parse_timestamp_ms(expected) == Some(*at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordId;
    use std::borrow::Cow;

    #[derive(Clone)]
    struct Person {
        id: RecordId,
        name: String,
        role: String,
        age: f64,
        joined: &'static str,
    }

    impl Listable for Person {
        fn id(&self) -> &RecordId {
            &self.id
        }

        fn searchable_text(&self) -> Vec<Cow<'_, str>> {
            vec![Cow::Borrowed(self.name.as_str())]
        }

        fn field(&self, key: &str) -> Option<FieldValue> {
            match key {
                "role" => FieldValue::text(self.role.clone()),
                "age" => FieldValue::number(self.age),
                "joined" => FieldValue::timestamp(self.joined),
                _ => None,
            }
        }
    }

    fn person(name: &str, role: &str, age: f64, joined: &'static str) -> Person {
        Person {
            id: RecordId::from(name),
            name: name.to_string(),
            role: role.to_string(),
            age,
            joined,
        }
    }

    #[test]
    fn empty_criteria_are_not_stored() {
        let mut criteria = FilterCriteria::default();
        criteria.set(SEARCH_KEY, FilterValue::search("  "));
        criteria.set("joined", FilterValue::between(None, None));
        assert!(criteria.is_empty());
        assert!(criteria.matches(&person("Ann", "admin", 30.0, "2024-01-01")));
    }

    #[test]
    fn setting_empty_value_clears_existing_key() {
        let mut criteria = FilterCriteria::default();
        criteria.set("role", FilterValue::exact("admin"));
        criteria.set("role", FilterValue::exact(""));
        assert!(criteria.get("role").is_none());
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let mut criteria = FilterCriteria::default();
        criteria.set(SEARCH_KEY, FilterValue::search("NN"));
        assert!(criteria.matches(&person("Ann", "admin", 30.0, "2024-01-01")));
        assert!(!criteria.matches(&person("Bob", "admin", 30.0, "2024-01-01")));
    }

    #[test]
    fn criteria_are_combined_with_and() {
        let mut criteria = FilterCriteria::default();
        criteria.set(SEARCH_KEY, FilterValue::search("a"));
        criteria.set("role", FilterValue::exact("Recruiter"));
        assert!(criteria.matches(&person("Dana", "recruiter", 41.0, "2024-01-01")));
        assert!(!criteria.matches(&person("Dana", "admin", 41.0, "2024-01-01")));
        assert!(!criteria.matches(&person("Eve", "recruiter", 41.0, "2024-01-01")));
    }

    #[test]
    fn exact_matches_numbers_numerically() {
        let mut criteria = FilterCriteria::default();
        criteria.set("age", FilterValue::exact("30"));
        assert!(criteria.matches(&person("Ann", "admin", 30.0, "2024-01-01")));
        assert!(!criteria.matches(&person("Ann", "admin", 31.0, "2024-01-01")));
    }

    #[test]
    fn range_bounds_are_inclusive_and_require_the_field() {
        let from = parse_timestamp_ms("2024-01-01");
        let to = parse_timestamp_ms("2024-01-31");
        let mut criteria = FilterCriteria::default();
        criteria.set("joined", FilterValue::between(from, to));
        assert!(criteria.matches(&person("Ann", "admin", 1.0, "2024-01-01")));
        assert!(criteria.matches(&person("Ann", "admin", 1.0, "2024-01-31")));
        assert!(!criteria.matches(&person("Ann", "admin", 1.0, "2024-02-01")));
        assert!(!criteria.matches(&person("Ann", "admin", 1.0, "not a date")));
    }
}
