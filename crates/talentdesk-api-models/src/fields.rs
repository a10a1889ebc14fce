//! Tagged decode steps for stringified JSON record fields.
//!
//! Candidate `education` and `address` arrive as JSON documents serialized
//! into string columns. Callers get a `Result` and decide how to degrade.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use talentdesk_core::{DecodeError, decode_json_str};

/// One education entry on a candidate profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    /// Degree or qualification name.
    pub degree: Option<String>,
    /// School or university.
    pub institution: Option<String>,
    /// Field of study.
    pub field_of_study: Option<String>,
    /// Graduation year; accepted as a number or a string.
    #[serde(deserialize_with = "string_or_number")]
    pub year: Option<String>,
}

/// Postal address on a candidate profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    /// Street line.
    pub street: Option<String>,
    /// City.
    pub city: Option<String>,
    /// State or region.
    pub state: Option<String>,
    /// Country.
    pub country: Option<String>,
    /// Postal or zip code; accepted as a number or a string.
    #[serde(deserialize_with = "string_or_number")]
    pub postal_code: Option<String>,
}

impl Address {
    /// Comma-joined non-empty parts, for table cells.
    #[must_use]
    pub fn one_line(&self) -> String {
        [
            &self.street,
            &self.city,
            &self.state,
            &self.postal_code,
            &self.country,
        ]
        .into_iter()
        .filter_map(|part| part.as_deref().map(str::trim))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

/// Decode a stringified JSON field into `T`.
///
/// # Errors
///
/// Returns [`DecodeError::Empty`] for a missing or blank field and
/// [`DecodeError::InvalidJson`] when the content does not fit `T`.
pub fn decode_json_field<T: DeserializeOwned>(
    field: &'static str,
    raw: Option<&str>,
) -> Result<T, DecodeError> {
    decode_json_str(field, raw)
}

/// Decode the `education` column, which holds either one entry or a list.
///
/// # Errors
///
/// See [`decode_json_field`].
pub fn parse_education(raw: Option<&str>) -> Result<Vec<Education>, DecodeError> {
    match decode_json_field::<OneOrMany<Education>>("education", raw)? {
        OneOrMany::Many(entries) => Ok(entries),
        OneOrMany::One(entry) => Ok(vec![entry]),
    }
}

/// Decode the `address` column.
///
/// # Errors
///
/// See [`decode_json_field`].
pub fn parse_address(raw: Option<&str>) -> Result<Address, DecodeError> {
    decode_json_field("address", raw)
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn education_accepts_one_or_many() {
        let many = parse_education(Some(
            r#"[{"degree":"BSc","institution":"MIT","year":2019},{"degree":"MSc"}]"#,
        ))
        .unwrap();
        assert_eq!(many.len(), 2);
        assert_eq!(many[0].year.as_deref(), Some("2019"));

        let one = parse_education(Some(r#"{"degree":"PhD","fieldOfStudy":"CS"}"#)).unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].field_of_study.as_deref(), Some("CS"));
    }

    #[test]
    fn education_failures_are_tagged() {
        assert_eq!(parse_education(None), Err(DecodeError::Empty { field: "education" }));
        assert!(matches!(
            parse_education(Some("not json")),
            Err(DecodeError::InvalidJson { field: "education", .. })
        ));
    }

    #[test]
    fn address_renders_on_one_line() {
        let address =
            parse_address(Some(r#"{"street":"1 Main St","city":"Austin","postalCode":78701}"#))
                .unwrap();
        assert_eq!(address.postal_code.as_deref(), Some("78701"));
        assert_eq!(address.one_line(), "1 Main St, Austin, 78701");
    }
}
