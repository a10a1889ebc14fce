//! Tagged decode steps for loosely shaped backend payloads.
//!
//! # Design
//! - List endpoints answer with `{ "result": [...] }` or a bare array; anything
//!   else is reported as [`DecodeError::UnexpectedShape`] instead of panicking.
//! - Stringified JSON fields are decoded through [`decode_json_str`] so callers
//!   match on a `Result` rather than catching parse failures ad hoc.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// Errors raised while decoding backend payloads.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The field was absent or blank.
    #[error("field is empty")]
    Empty {
        /// Field being decoded.
        field: &'static str,
    },
    /// The field did not contain valid JSON for the expected type.
    #[error("field is not valid json")]
    InvalidJson {
        /// Field being decoded.
        field: &'static str,
        /// Parser diagnostic.
        detail: String,
    },
    /// The payload was valid JSON but not in the expected shape.
    #[error("payload has an unexpected shape")]
    UnexpectedShape {
        /// Shape the caller expected.
        expected: &'static str,
        /// JSON kind actually received.
        found: &'static str,
    },
}

/// Records decoded from a list payload plus the number of rejected entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedCollection<T> {
    /// Successfully decoded records, in payload order.
    pub records: Vec<T>,
    /// Entries that failed to decode and were skipped.
    pub skipped: usize,
}

/// Name of the JSON kind for diagnostics.
#[must_use]
pub const fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Borrow the list entries from a `{ result: [...] }` or bare-array payload.
///
/// # Errors
///
/// Returns [`DecodeError::UnexpectedShape`] when neither envelope matches.
pub fn collection_items(payload: &Value) -> Result<&[Value], DecodeError> {
    match payload {
        Value::Array(items) => Ok(items),
        Value::Object(map) => match map.get("result") {
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(DecodeError::UnexpectedShape {
                expected: "array",
                found: kind_name(other),
            }),
            None => Err(DecodeError::UnexpectedShape {
                expected: "array or { result: array }",
                found: "object",
            }),
        },
        other => Err(DecodeError::UnexpectedShape {
            expected: "array or { result: array }",
            found: kind_name(other),
        }),
    }
}

/// Decode every entry of a list payload, skipping entries that do not fit `T`.
///
/// # Errors
///
/// Returns [`DecodeError::UnexpectedShape`] when the payload is not a list.
pub fn decode_collection<T: DeserializeOwned>(
    payload: &Value,
) -> Result<DecodedCollection<T>, DecodeError> {
    let items = collection_items(payload)?;
    let mut records = Vec::with_capacity(items.len());
    let mut skipped = 0;
    for (index, item) in items.iter().enumerate() {
        match T::deserialize(item) {
            Ok(record) => records.push(record),
            Err(err) => {
                skipped += 1;
                warn!(index, error = %err, "skipping malformed record");
            }
        }
    }
    Ok(DecodedCollection { records, skipped })
}

/// Unwrap a single-record response that may be wrapped in `{ result: {...} }`.
#[must_use]
pub fn record_item(payload: &Value) -> &Value {
    match payload {
        Value::Object(map) => match map.get("result") {
            Some(inner @ Value::Object(_)) => inner,
            _ => payload,
        },
        _ => payload,
    }
}

/// Decode a JSON document stored as a string field.
///
/// # Errors
///
/// Returns [`DecodeError::Empty`] for missing or blank input and
/// [`DecodeError::InvalidJson`] when the text does not parse as `T`.
pub fn decode_json_str<T: DeserializeOwned>(
    field: &'static str,
    raw: Option<&str>,
) -> Result<T, DecodeError> {
    let text = raw.map(str::trim).filter(|text| !text.is_empty());
    let Some(text) = text else {
        return Err(DecodeError::Empty { field });
    };
    serde_json::from_str(text).map_err(|err| DecodeError::InvalidJson {
        field,
        detail: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: i64,
    }

    #[test]
    fn both_list_envelopes_are_accepted() {
        let bare = json!([{ "id": 1 }]);
        let wrapped = json!({ "result": [{ "id": 1 }, { "id": 2 }] });
        assert_eq!(collection_items(&bare).unwrap().len(), 1);
        assert_eq!(collection_items(&wrapped).unwrap().len(), 2);
    }

    #[test]
    fn non_list_payloads_are_tagged() {
        let err = collection_items(&json!({ "error": "fail" })).unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnexpectedShape {
                expected: "array or { result: array }",
                found: "object"
            }
        );
        let err = collection_items(&json!({ "result": "nope" })).unwrap_err();
        assert!(matches!(err, DecodeError::UnexpectedShape { found: "string", .. }));
        assert!(collection_items(&Value::Null).is_err());
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let payload = json!([{ "id": 1 }, { "id": "x" }, { "id": 3 }]);
        let decoded = decode_collection::<Row>(&payload).unwrap();
        assert_eq!(decoded.records, vec![Row { id: 1 }, Row { id: 3 }]);
        assert_eq!(decoded.skipped, 1);
    }

    #[test]
    fn record_item_unwraps_result_objects() {
        let wrapped = json!({ "result": { "id": 9 }, "message": "created" });
        assert_eq!(record_item(&wrapped), &json!({ "id": 9 }));
        let bare = json!({ "id": 9 });
        assert_eq!(record_item(&bare), &bare);
    }

    #[test]
    fn json_strings_decode_or_report() {
        let parsed: Vec<i64> = decode_json_str("scores", Some("[1, 2]")).unwrap();
        assert_eq!(parsed, vec![1, 2]);
        assert_eq!(
            decode_json_str::<Vec<i64>>("scores", Some("  ")),
            Err(DecodeError::Empty { field: "scores" })
        );
        assert!(matches!(
            decode_json_str::<Vec<i64>>("scores", Some("{oops")),
            Err(DecodeError::InvalidJson { field: "scores", .. })
        ));
    }
}
