//! Record identity and the field accessors lists use to filter and sort.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Opaque record identifier as emitted by the backend.
///
/// Integer ids re-encode as JSON numbers, string ids as JSON strings, so the
/// identifier round-trips in the shape the server produced.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    /// Integer identifier.
    Numeric(i64),
    /// String identifier.
    Text(String),
}

impl RecordId {
    /// Interpret user input as an id, preferring the integer form.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        trimmed
            .parse::<i64>()
            .map_or_else(|_| Self::Text(trimmed.to_string()), Self::Numeric)
    }
}

impl Display for RecordId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(value) => write!(formatter, "{value}"),
            Self::Text(value) => formatter.write_str(value),
        }
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self::Numeric(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Typed value a record exposes for a field key.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// Free-form text, compared case-sensitively.
    Text(String),
    /// Finite number, compared numerically.
    Number(f64),
    /// Epoch milliseconds.
    Timestamp(i64),
}

impl FieldValue {
    /// Text value; blank strings are treated as missing.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            None
        } else {
            Some(Self::Text(value))
        }
    }

    /// Numeric value; non-finite numbers are treated as missing.
    #[must_use]
    pub const fn number(value: f64) -> Option<Self> {
        if value.is_finite() {
            Some(Self::Number(value))
        } else {
            None
        }
    }

    /// Timestamp parsed from a loosely formatted date string.
    #[must_use]
    pub fn timestamp(raw: &str) -> Option<Self> {
        parse_timestamp_ms(raw).map(Self::Timestamp)
    }

    const fn rank(&self) -> u8 {
        match self {
            Self::Number(_) => 0,
            Self::Timestamp(_) => 1,
            Self::Text(_) => 2,
        }
    }

    /// Total ordering used by sorting. Mixed kinds order number < timestamp < text.
    #[must_use]
    pub fn cmp_value(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Text(left), Self::Text(right)) => left.cmp(right),
            (Self::Number(left), Self::Number(right)) => left.total_cmp(right),
            (Self::Timestamp(left), Self::Timestamp(right)) => left.cmp(right),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Parse RFC 3339, `YYYY-MM-DD HH:MM:SS`, or `YYYY-MM-DD` into epoch milliseconds.
#[must_use]
pub fn parse_timestamp_ms(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.timestamp_millis());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc().timestamp_millis())
}

/// Accessors a record type supplies so a list can filter and sort it.
pub trait Listable: Clone {
    /// Unique identifier within a collection snapshot.
    fn id(&self) -> &RecordId;

    /// Text fields matched by free-text search.
    fn searchable_text(&self) -> Vec<Cow<'_, str>>;

    /// Typed value for a field key, or `None` when missing.
    fn field(&self, key: &str) -> Option<FieldValue>;
}

/// A listable record served by a REST resource.
pub trait Entity:
    Listable + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Resource path relative to the API base URL (e.g. `candidates`).
    const RESOURCE: &'static str;
    /// Singular human label used in notices.
    const LABEL: &'static str;
    /// Plural human label used in notices.
    const PLURAL: &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_keeps_wire_shape() {
        let numeric: RecordId = serde_json::from_str("42").unwrap();
        let text: RecordId = serde_json::from_str("\"a-1\"").unwrap();
        assert_eq!(numeric, RecordId::Numeric(42));
        assert_eq!(text, RecordId::from("a-1"));
        assert_eq!(serde_json::to_string(&numeric).unwrap(), "42");
        assert_eq!(serde_json::to_string(&text).unwrap(), "\"a-1\"");
    }

    #[test]
    fn record_id_parse_prefers_integers() {
        assert_eq!(RecordId::parse(" 7 "), RecordId::Numeric(7));
        assert_eq!(RecordId::parse("64af"), RecordId::from("64af"));
        assert_eq!(RecordId::parse("64af").to_string(), "64af");
    }

    #[test]
    fn timestamps_parse_common_shapes() {
        let day = parse_timestamp_ms("2024-03-01").unwrap();
        let rfc = parse_timestamp_ms("2024-03-01T00:00:00Z").unwrap();
        let naive = parse_timestamp_ms("2024-03-01 00:00:00").unwrap();
        assert_eq!(day, rfc);
        assert_eq!(day, naive);
        assert!(parse_timestamp_ms("yesterday").is_none());
        assert!(parse_timestamp_ms("  ").is_none());
    }

    #[test]
    fn field_constructors_drop_unusable_values() {
        assert!(FieldValue::text("   ").is_none());
        assert!(FieldValue::number(f64::NAN).is_none());
        assert_eq!(FieldValue::number(2.5), Some(FieldValue::Number(2.5)));
    }

    #[test]
    fn mixed_kinds_have_a_total_order() {
        let number = FieldValue::Number(10.0);
        let stamp = FieldValue::Timestamp(1);
        let text = FieldValue::Text("a".into());
        assert_eq!(number.cmp_value(&stamp), Ordering::Less);
        assert_eq!(text.cmp_value(&stamp), Ordering::Greater);
        assert_eq!(
            FieldValue::Text("B".into()).cmp_value(&FieldValue::Text("a".into())),
            Ordering::Less
        );
    }
}
