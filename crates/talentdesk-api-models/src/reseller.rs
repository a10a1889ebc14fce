//! Reseller accounts served by `/resellers`.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use talentdesk_core::{Entity, FieldValue, Listable, RecordId};

use crate::{text_field, timestamp_field};

/// Partner account provisioned through the reseller panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reseller {
    /// Backend identifier.
    pub id: RecordId,
    /// Contact name.
    #[serde(default)]
    pub name: String,
    /// Company name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Contact email.
    #[serde(default)]
    pub email: String,
    /// Contact phone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Account status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Subscription plan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Listable for Reseller {
    fn id(&self) -> &RecordId {
        &self.id
    }

    fn searchable_text(&self) -> Vec<Cow<'_, str>> {
        [
            Some(self.name.as_str()),
            self.company.as_deref(),
            Some(self.email.as_str()),
            self.phone.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(Cow::Borrowed)
        .collect()
    }

    fn field(&self, key: &str) -> Option<FieldValue> {
        match key {
            "name" => FieldValue::text(self.name.as_str()),
            "company" => text_field(self.company.as_deref()),
            "email" => FieldValue::text(self.email.as_str()),
            "status" => text_field(self.status.as_deref()),
            "plan" => text_field(self.plan.as_deref()),
            "created_at" => timestamp_field(self.created_at.as_deref()),
            _ => None,
        }
    }
}

impl Entity for Reseller {
    const RESOURCE: &'static str = "resellers";
    const LABEL: &'static str = "reseller";
    const PLURAL: &'static str = "resellers";
}
