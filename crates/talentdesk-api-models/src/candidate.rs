//! Candidate records served by `/candidates`.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use talentdesk_core::{DecodeError, Entity, FieldValue, Listable, RecordId};

use crate::fields::{Address, Education, parse_address, parse_education};
use crate::{text_field, timestamp_field};

/// Applicant tracked by the recruiting dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Backend identifier.
    pub id: RecordId,
    /// Full name.
    #[serde(default)]
    pub name: String,
    /// Contact email.
    #[serde(default)]
    pub email: String,
    /// Skill tags.
    #[serde(default)]
    pub skill: Vec<String>,
    /// Current employer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_company: Option<String>,
    /// Role applied for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Owning agency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agency_id: Option<RecordId>,
    /// Pipeline status (e.g. `Active`, `Shortlisted`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Years of professional experience.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_years: Option<f64>,
    /// Stringified JSON education entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    /// Stringified JSON address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Creation timestamp as sent by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update timestamp as sent by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Candidate {
    /// Decoded education history.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] when the column is blank or malformed.
    pub fn education_entries(&self) -> Result<Vec<Education>, DecodeError> {
        parse_education(self.education.as_deref())
    }

    /// Decoded postal address.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] when the column is blank or malformed.
    pub fn postal_address(&self) -> Result<Address, DecodeError> {
        parse_address(self.address.as_deref())
    }
}

impl Listable for Candidate {
    fn id(&self) -> &RecordId {
        &self.id
    }

    fn searchable_text(&self) -> Vec<Cow<'_, str>> {
        let mut text = Vec::with_capacity(self.skill.len() + 3);
        text.push(Cow::Borrowed(self.name.as_str()));
        text.extend(self.skill.iter().map(|skill| Cow::Borrowed(skill.as_str())));
        if let Some(company) = &self.current_company {
            text.push(Cow::Borrowed(company.as_str()));
        }
        text.push(Cow::Borrowed(self.email.as_str()));
        text
    }

    fn field(&self, key: &str) -> Option<FieldValue> {
        match key {
            "name" => FieldValue::text(self.name.as_str()),
            "email" => FieldValue::text(self.email.as_str()),
            "company" => text_field(self.current_company.as_deref()),
            "role" => text_field(self.role.as_deref()),
            "status" => text_field(self.status.as_deref()),
            "agency" => self
                .agency_id
                .as_ref()
                .and_then(|agency| FieldValue::text(agency.to_string())),
            "experience" => self.experience_years.and_then(FieldValue::number),
            "created_at" => timestamp_field(self.created_at.as_deref()),
            "updated_at" => timestamp_field(self.updated_at.as_deref()),
            _ => None,
        }
    }
}

impl Entity for Candidate {
    const RESOURCE: &'static str = "candidates";
    const LABEL: &'static str = "candidate";
    const PLURAL: &'static str = "candidates";
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Candidate {
        serde_json::from_value(json!({
            "id": 7,
            "name": "Ann Lee",
            "email": "ann@example.com",
            "skill": ["Rust", "SQL"],
            "currentCompany": "Acme",
            "agencyId": 12,
            "status": "Active",
            "experienceYears": 4.5,
            "education": "[{\"degree\":\"BSc\"}]",
            "address": "{\"city\":\"Austin\"}",
            "createdAt": "2024-02-10T09:30:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn decodes_camel_case_payloads() {
        let candidate = sample();
        assert_eq!(candidate.id, RecordId::from(7));
        assert_eq!(candidate.agency_id, Some(RecordId::from(12)));
        assert_eq!(candidate.education_entries().unwrap()[0].degree.as_deref(), Some("BSc"));
        assert_eq!(candidate.postal_address().unwrap().city.as_deref(), Some("Austin"));
    }

    #[test]
    fn sparse_payloads_use_defaults() {
        let candidate: Candidate = serde_json::from_value(json!({ "id": "c-1" })).unwrap();
        assert!(candidate.skill.is_empty());
        assert!(candidate.field("status").is_none());
        assert!(candidate.education_entries().is_err());
    }

    #[test]
    fn field_accessors_expose_typed_values() {
        let candidate = sample();
        assert_eq!(candidate.field("agency"), Some(FieldValue::Text("12".into())));
        assert_eq!(candidate.field("experience"), Some(FieldValue::Number(4.5)));
        assert!(matches!(candidate.field("created_at"), Some(FieldValue::Timestamp(_))));
        let text = candidate.searchable_text();
        assert!(text.iter().any(|value| value == "SQL"));
        assert!(text.iter().any(|value| value == "Acme"));
    }
}
