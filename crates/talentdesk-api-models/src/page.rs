//! Content pages served by `/pages`.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use talentdesk_core::{Entity, FieldValue, Listable, RecordId};

use crate::{text_field, timestamp_field};

/// CMS page edited from the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Backend identifier.
    pub id: RecordId,
    /// Page title.
    #[serde(default)]
    pub title: String,
    /// URL slug.
    #[serde(default)]
    pub slug: String,
    /// Publication status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Rendered body content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Listable for Page {
    fn id(&self) -> &RecordId {
        &self.id
    }

    fn searchable_text(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.title.as_str()),
            Cow::Borrowed(self.slug.as_str()),
        ]
    }

    fn field(&self, key: &str) -> Option<FieldValue> {
        match key {
            "title" => FieldValue::text(self.title.as_str()),
            "slug" => FieldValue::text(self.slug.as_str()),
            "status" => text_field(self.status.as_deref()),
            "created_at" => timestamp_field(self.created_at.as_deref()),
            "updated_at" => timestamp_field(self.updated_at.as_deref()),
            _ => None,
        }
    }
}

impl Entity for Page {
    const RESOURCE: &'static str = "pages";
    const LABEL: &'static str = "page";
    const PLURAL: &'static str = "pages";
}
