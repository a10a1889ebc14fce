//! Bulk upload DTOs.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use talentdesk_core::{DecodeError, decode_collection};

/// Per-file outcome reported by an upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadFileResult {
    /// Whether the backend accepted the file.
    #[serde(default)]
    pub success: bool,
    /// Name of the uploaded file.
    #[serde(default)]
    pub file_name: String,
    /// Backend message, usually the rejection reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Upload results split into accepted and rejected files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReport {
    /// Files the backend accepted.
    pub succeeded: Vec<UploadFileResult>,
    /// Files the backend rejected.
    pub failed: Vec<UploadFileResult>,
}

impl UploadReport {
    /// Partition per-file results, keeping response order within each side.
    #[must_use]
    pub fn from_results(results: Vec<UploadFileResult>) -> Self {
        let (succeeded, failed) = results.into_iter().partition(|result| result.success);
        Self { succeeded, failed }
    }

    /// Total files reported.
    #[must_use]
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// Whether every reported file was rejected (or none were reported).
    #[must_use]
    pub fn nothing_succeeded(&self) -> bool {
        self.succeeded.is_empty()
    }
}

/// Decode an upload response (`[...]` or `{ result: [...] }`).
///
/// # Errors
///
/// Returns [`DecodeError::UnexpectedShape`] when the body is not a list.
pub fn decode_upload_results(payload: &Value) -> Result<Vec<UploadFileResult>, DecodeError> {
    decode_collection(payload).map(|decoded| decoded.records)
}

/// Text fields sent alongside uploaded files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadMetadata {
    /// Job the files are attached to.
    pub job_id: Option<String>,
    /// Agency the files belong to.
    pub agency_id: Option<String>,
    /// Client-chosen batch identifier.
    pub batch_id: Option<String>,
}

impl UploadMetadata {
    /// Non-blank metadata as multipart field name/value pairs.
    #[must_use]
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        [
            ("job_id", &self.job_id),
            ("agency_id", &self.agency_id),
            ("batch_id", &self.batch_id),
        ]
        .into_iter()
        .filter_map(|(name, value)| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(|value| (name, value.to_string()))
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn results_are_partitioned() {
        let results = decode_upload_results(&json!({ "result": [
            { "success": true, "fileName": "a.pdf" },
            { "success": false, "fileName": "b.pdf", "message": "unsupported format" },
            { "success": true, "fileName": "c.pdf" }
        ]}))
        .unwrap();
        let report = UploadReport::from_results(results);
        assert_eq!(report.total(), 3);
        assert_eq!(report.succeeded.len(), 2);
        assert_eq!(report.failed[0].file_name, "b.pdf");
        assert_eq!(report.failed[0].message.as_deref(), Some("unsupported format"));
        assert!(!report.nothing_succeeded());
    }

    #[test]
    fn non_list_upload_response_is_tagged() {
        assert!(matches!(
            decode_upload_results(&json!({ "ok": true })),
            Err(DecodeError::UnexpectedShape { .. })
        ));
    }

    #[test]
    fn blank_metadata_is_not_sent() {
        let metadata = UploadMetadata {
            job_id: Some("42".into()),
            agency_id: Some("  ".into()),
            batch_id: None,
        };
        assert_eq!(metadata.form_fields(), vec![("job_id", "42".to_string())]);
    }
}
