//! Dashboard operators served by `/app-users`.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use talentdesk_core::{Entity, FieldValue, Listable, RecordId};

use crate::{text_field, timestamp_field};

/// Operator account with access to the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppUser {
    /// Backend identifier.
    pub id: RecordId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Login email.
    #[serde(default)]
    pub email: String,
    /// Access role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Account status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Listable for AppUser {
    fn id(&self) -> &RecordId {
        &self.id
    }

    fn searchable_text(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.name.as_str()),
            Cow::Borrowed(self.email.as_str()),
        ]
    }

    fn field(&self, key: &str) -> Option<FieldValue> {
        match key {
            "name" => FieldValue::text(self.name.as_str()),
            "email" => FieldValue::text(self.email.as_str()),
            "role" => text_field(self.role.as_deref()),
            "status" => text_field(self.status.as_deref()),
            "created_at" => timestamp_field(self.created_at.as_deref()),
            _ => None,
        }
    }
}

impl Entity for AppUser {
    const RESOURCE: &'static str = "app-users";
    const LABEL: &'static str = "user";
    const PLURAL: &'static str = "users";
}
