//! Upload history served by `/upload-logs`.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use talentdesk_core::{Entity, FieldValue, Listable, RecordId};

use crate::{text_field, timestamp_field};

/// One processed file from a bulk upload batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadLog {
    /// Backend identifier.
    pub id: RecordId,
    /// Uploaded file name.
    #[serde(default)]
    pub file_name: String,
    /// Batch the file belonged to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,
    /// Job the upload targeted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<RecordId>,
    /// Agency the upload targeted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agency_id: Option<RecordId>,
    /// Processing status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Backend message for the file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Listable for UploadLog {
    fn id(&self) -> &RecordId {
        &self.id
    }

    fn searchable_text(&self) -> Vec<Cow<'_, str>> {
        [
            Some(self.file_name.as_str()),
            self.batch_id.as_deref(),
            self.message.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(Cow::Borrowed)
        .collect()
    }

    fn field(&self, key: &str) -> Option<FieldValue> {
        match key {
            "file" => FieldValue::text(self.file_name.as_str()),
            "batch" => text_field(self.batch_id.as_deref()),
            "job" => self
                .job_id
                .as_ref()
                .and_then(|job| FieldValue::text(job.to_string())),
            "agency" => self
                .agency_id
                .as_ref()
                .and_then(|agency| FieldValue::text(agency.to_string())),
            "status" => text_field(self.status.as_deref()),
            "created_at" => timestamp_field(self.created_at.as_deref()),
            _ => None,
        }
    }
}

impl Entity for UploadLog {
    const RESOURCE: &'static str = "upload-logs";
    const LABEL: &'static str = "upload log";
    const PLURAL: &'static str = "upload logs";
}
