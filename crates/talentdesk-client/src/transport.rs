//! Async seam over the admin REST contract.
//!
//! # Design
//! - Resource paths are relative (`candidates`, `candidates/7`) and joined
//!   onto the configured base URL by the implementation.
//! - List and create responses are returned as raw JSON; callers decode them
//!   through the tagged steps in `talentdesk-core`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use talentdesk_api_models::UploadMetadata;
use talentdesk_core::RecordId;

use crate::error::ClientError;

/// Remote collection source for every entity type.
#[async_trait]
pub trait Transport: Send + Sync {
    /// `GET /<resource>`.
    async fn list(&self, resource: &str) -> Result<Value, ClientError>;

    /// `POST /<resource>` with a JSON body.
    async fn create(&self, resource: &str, body: &Value) -> Result<Value, ClientError>;

    /// `PUT /<resource>/{id}` with the full updated record.
    async fn update(&self, resource: &str, id: &RecordId, body: &Value)
    -> Result<Value, ClientError>;

    /// `DELETE /<resource>/{id}`.
    async fn delete(&self, resource: &str, id: &RecordId) -> Result<(), ClientError>;

    /// `POST /<resource>/bulk-delete` with `{ "ids": [...] }`.
    async fn bulk_delete(&self, resource: &str, ids: &[RecordId]) -> Result<(), ClientError>;

    /// Multipart `POST /<endpoint>` carrying files plus metadata fields.
    async fn upload(&self, endpoint: &str, request: &UploadRequest) -> Result<Value, ClientError>;
}

/// One file queued for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// File name reported to the server.
    pub file_name: String,
    /// MIME type, inferred from the extension when read from disk.
    pub content_type: Option<String>,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Read a file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Io`] when the file cannot be read.
    pub async fn read(path: &Path) -> Result<Self, ClientError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ClientError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let file_name = path
            .file_name()
            .map_or_else(|| "upload".to_string(), |name| name.to_string_lossy().into_owned());
        Ok(Self {
            content_type: content_type_for(path).map(str::to_string),
            file_name,
            bytes,
        })
    }
}

/// Files plus metadata for one upload call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadRequest {
    /// Files sent as repeated `file` parts.
    pub files: Vec<UploadFile>,
    /// Text fields sent alongside the files.
    pub metadata: UploadMetadata,
}

impl UploadRequest {
    /// Read every path into an upload request.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Io`] for the first file that cannot be read.
    pub async fn from_paths(
        paths: &[PathBuf],
        metadata: UploadMetadata,
    ) -> Result<Self, ClientError> {
        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            files.push(UploadFile::read(path).await?);
        }
        Ok(Self { files, metadata })
    }
}

fn content_type_for(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    Some(match extension.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "csv" => "text/csv",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "json" => "application/json",
        "txt" => "text/plain",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn files_are_read_with_inferred_type() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("Resume.PDF");
        std::fs::write(&path, b"%PDF-1.7").expect("write");
        let request = UploadRequest::from_paths(&[path], UploadMetadata::default())
            .await
            .expect("read upload");
        assert_eq!(request.files[0].file_name, "Resume.PDF");
        assert_eq!(request.files[0].content_type.as_deref(), Some("application/pdf"));
        assert_eq!(request.files[0].bytes, b"%PDF-1.7");
    }

    #[tokio::test]
    async fn missing_files_report_their_path() {
        let missing = PathBuf::from("/definitely/not/here.csv");
        let err = UploadFile::read(&missing).await.expect_err("missing file");
        assert!(matches!(err, ClientError::Io { ref path, .. } if path == &missing));
    }
}
