//! Single-column sorting.

use std::cmp::Ordering;

use crate::record::{FieldValue, Listable};

/// Sort direction for the active sort key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

impl SortDirection {
    /// The opposite direction.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Short label for display.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// Active sort key and direction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortSpec {
    /// Field key passed to [`Listable::field`].
    pub key: String,
    /// Direction applied to present values.
    pub direction: SortDirection,
}

impl SortSpec {
    /// Ascending sort on `key`.
    #[must_use]
    pub fn ascending(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Ascending,
        }
    }

    /// Next spec after the user picks `key`: same key flips, new key starts ascending.
    #[must_use]
    pub fn next(current: Option<&Self>, key: &str) -> Self {
        match current {
            Some(spec) if spec.key == key => Self {
                key: spec.key.clone(),
                direction: spec.direction.toggled(),
            },
            _ => Self::ascending(key),
        }
    }
}

/// Compare two optional values; missing values sort last in either direction.
#[must_use]
pub fn compare_optional(
    left: Option<&FieldValue>,
    right: Option<&FieldValue>,
    direction: SortDirection,
) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => {
            let ordering = left.cmp_value(right);
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable-sort `indices` (positions into `records`) by the spec.
pub fn sort_indices<T: Listable>(records: &[T], indices: &mut [usize], spec: &SortSpec) {
    let keys: Vec<Option<FieldValue>> = records
        .iter()
        .map(|record| record.field(&spec.key))
        .collect();
    indices.sort_by(|left, right| {
        compare_optional(
            keys.get(*left).and_then(Option::as_ref),
            keys.get(*right).and_then(Option::as_ref),
            spec.direction,
        )
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picking_the_same_key_toggles() {
        let first = SortSpec::next(None, "name");
        assert_eq!(first.direction, SortDirection::Ascending);
        let second = SortSpec::next(Some(&first), "name");
        assert_eq!(second.direction, SortDirection::Descending);
        let other = SortSpec::next(Some(&second), "email");
        assert_eq!(other, SortSpec::ascending("email"));
    }

    #[test]
    fn missing_values_sort_last_both_ways() {
        let present = FieldValue::Number(1.0);
        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            assert_eq!(
                compare_optional(Some(&present), None, direction),
                Ordering::Less
            );
            assert_eq!(
                compare_optional(None, Some(&present), direction),
                Ordering::Greater
            );
        }
    }

    #[test]
    fn descending_reverses_present_values() {
        let low = FieldValue::Number(1.0);
        let high = FieldValue::Number(2.0);
        assert_eq!(
            compare_optional(Some(&low), Some(&high), SortDirection::Descending),
            Ordering::Greater
        );
        assert_eq!(SortDirection::Descending.as_str(), "desc");
    }
}
