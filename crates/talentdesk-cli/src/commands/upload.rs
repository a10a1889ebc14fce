//! `upload`: send files as one multipart request and report per-file results.

use anyhow::anyhow;
use talentdesk_api_models::UploadMetadata;
use talentdesk_client::UploadRequest;
use talentdesk_core::Entity;

use crate::cli::UploadArgs;
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{TableRow, render_upload};

/// `T` is the list refetched once any file is accepted.
pub(crate) async fn handle_upload<T: Entity + TableRow>(
    ctx: &AppContext,
    args: UploadArgs,
) -> CliResult<String> {
    let metadata = UploadMetadata {
        job_id: args.job_id,
        agency_id: args.agency_id,
        batch_id: args.batch_id,
    };
    let request = UploadRequest::from_paths(&args.files, metadata).await?;
    let report = ctx
        .dispatcher::<T>()
        .upload(&args.endpoint, request)
        .await?;
    if report.total() > 0 && report.nothing_succeeded() {
        return Err(CliError::failure(anyhow!("no files were accepted")));
    }
    render_upload(&report, ctx.output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{EntityKind, OutputFormat};
    use crate::client::tests::context_for;
    use httpmock::prelude::*;
    use serde_json::json;
    use talentdesk_api_models::Candidate;

    fn upload_args(dir: &std::path::Path, names: &[&str]) -> UploadArgs {
        let files = names
            .iter()
            .map(|name| {
                let path = dir.join(name);
                std::fs::write(&path, b"resume body").unwrap();
                path
            })
            .collect();
        UploadArgs {
            endpoint: "candidates/upload".into(),
            files,
            job_id: Some("j-9".into()),
            agency_id: None,
            batch_id: Some("batch-1".into()),
            entity: EntityKind::Candidates,
        }
    }

    #[tokio::test]
    async fn partial_upload_reports_each_file_and_refetches() {
        let server = MockServer::start_async().await;
        let upload = server.mock(|when, then| {
            when.method(POST)
                .path("/api/candidates/upload")
                .body_includes("name=\"job_id\"")
                .body_includes("batch-1")
                .body_includes("filename=\"a.pdf\"")
                .body_includes("filename=\"b.txt\"");
            then.status(200).json_body(json!([
                { "success": true, "fileName": "a.pdf" },
                { "success": false, "fileName": "b.txt", "message": "unsupported format" }
            ]));
        });
        let list = server.mock(|when, then| {
            when.method(GET).path("/api/candidates");
            then.status(200).json_body(json!([]));
        });
        let dir = tempfile::tempdir().unwrap();
        let ctx = context_for(&server.base_url(), dir.path(), OutputFormat::Table);

        let text = handle_upload::<Candidate>(&ctx, upload_args(dir.path(), &["a.pdf", "b.txt"]))
            .await
            .unwrap();

        upload.assert();
        list.assert();
        assert!(text.ends_with("1 of 2 files accepted"));
        let notices = ctx
            .notices
            .drain()
            .into_iter()
            .map(|notice| notice.to_string())
            .collect::<Vec<_>>();
        assert_eq!(
            notices,
            vec![
                "ok: Uploaded 1 of 2 files".to_string(),
                "error: b.txt: unsupported format".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn upload_with_no_accepted_files_fails() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/candidates/upload");
            then.status(200)
                .json_body(json!({ "result": [{ "success": false, "fileName": "a.pdf" }] }));
        });
        let list = server.mock(|when, then| {
            when.method(GET).path("/api/candidates");
            then.status(200).json_body(json!([]));
        });
        let dir = tempfile::tempdir().unwrap();
        let ctx = context_for(&server.base_url(), dir.path(), OutputFormat::Table);

        let err = handle_upload::<Candidate>(&ctx, upload_args(dir.path(), &["a.pdf"]))
            .await
            .unwrap_err();

        assert_eq!(err.exit_code(), 3);
        list.assert_calls(0);
    }

    #[tokio::test]
    async fn missing_files_fail_before_any_request() {
        let server = MockServer::start_async().await;
        let upload = server.mock(|when, then| {
            when.method(POST).path("/api/candidates/upload");
            then.status(200);
        });
        let dir = tempfile::tempdir().unwrap();
        let ctx = context_for(&server.base_url(), dir.path(), OutputFormat::Table);
        let mut args = upload_args(dir.path(), &[]);
        args.files = vec![dir.path().join("missing.pdf")];

        let err = handle_upload::<Candidate>(&ctx, args).await.unwrap_err();

        assert_eq!(err.exit_code(), 3);
        assert!(err.display_message().contains("missing.pdf"));
        upload.assert_calls(0);
    }
}
