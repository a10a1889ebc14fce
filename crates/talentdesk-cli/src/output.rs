//! Output renderers for CLI commands.
//!
//! Renderers return the text instead of printing it so `run()` decides where
//! it goes and tests can assert on it.

use anyhow::anyhow;
use serde::Serialize;
use serde_json::json;
use talentdesk_api_models::{AppUser, Candidate, Page, Reseller, UploadLog, UploadReport};
use talentdesk_core::DerivedView;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

const EMPTY_CELL: &str = "-";

/// Columns an entity contributes to the `ls` table.
pub(crate) trait TableRow {
    /// Column headers, in display order.
    const HEADERS: &'static [&'static str];

    /// One cell per header.
    fn cells(&self) -> Vec<String>;
}

fn cell(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(EMPTY_CELL)
        .to_string()
}

impl TableRow for Candidate {
    const HEADERS: &'static [&'static str] =
        &["ID", "NAME", "EMAIL", "STATUS", "COMPANY", "SKILLS"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            cell(Some(&self.name)),
            cell(Some(&self.email)),
            cell(self.status.as_deref()),
            cell(self.current_company.as_deref()),
            cell(Some(&self.skill.join(", "))),
        ]
    }
}

impl TableRow for Reseller {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "COMPANY", "EMAIL", "STATUS", "PLAN"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            cell(Some(&self.name)),
            cell(self.company.as_deref()),
            cell(Some(&self.email)),
            cell(self.status.as_deref()),
            cell(self.plan.as_deref()),
        ]
    }
}

impl TableRow for Page {
    const HEADERS: &'static [&'static str] = &["ID", "TITLE", "SLUG", "STATUS", "UPDATED"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            cell(Some(&self.title)),
            cell(Some(&self.slug)),
            cell(self.status.as_deref()),
            cell(self.updated_at.as_deref()),
        ]
    }
}

impl TableRow for UploadLog {
    const HEADERS: &'static [&'static str] =
        &["ID", "FILE", "BATCH", "STATUS", "CREATED", "MESSAGE"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            cell(Some(&self.file_name)),
            cell(self.batch_id.as_deref()),
            cell(self.status.as_deref()),
            cell(self.created_at.as_deref()),
            cell(self.message.as_deref()),
        ]
    }
}

impl TableRow for AppUser {
    const HEADERS: &'static [&'static str] = &["ID", "NAME", "EMAIL", "ROLE", "STATUS"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            cell(Some(&self.name)),
            cell(Some(&self.email)),
            cell(self.role.as_deref()),
            cell(self.status.as_deref()),
        ]
    }
}

/// Render one page of a list with its paging footer.
pub(crate) fn render_list<T: TableRow + Serialize>(
    view: &DerivedView<'_, T>,
    format: OutputFormat,
) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(&json!({
            "page": view.page_index,
            "pageSize": view.page_size,
            "pageCount": view.page_count,
            "totalMatching": view.total_matching,
            "totalRecords": view.total_records,
            "rows": view.rows,
        })),
        OutputFormat::Table => {
            let rows = view.rows.iter().map(|row| row.cells()).collect::<Vec<_>>();
            let mut text = table(T::HEADERS, &rows);
            text.push_str(&format!(
                "page {} of {} ({} matching, {} loaded)",
                view.page_index,
                view.page_count.max(1),
                view.total_matching,
                view.total_records
            ));
            Ok(text)
        }
    }
}

/// Render a single record.
pub(crate) fn render_record<T: TableRow + Serialize>(
    record: &T,
    format: OutputFormat,
) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(record),
        OutputFormat::Table => {
            let width = T::HEADERS.iter().map(|header| header.len()).max().unwrap_or(0);
            let lines = T::HEADERS
                .iter()
                .zip(record.cells())
                .map(|(header, value)| format!("{:<width$}  {value}", header.to_lowercase()))
                .collect::<Vec<_>>();
            Ok(lines.join("\n"))
        }
    }
}

/// Render per-file upload outcomes.
pub(crate) fn render_upload(report: &UploadReport, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(&json!({
            "succeeded": report.succeeded,
            "failed": report.failed,
        })),
        OutputFormat::Table => {
            let rows = report
                .succeeded
                .iter()
                .chain(&report.failed)
                .map(|result| {
                    vec![
                        result.file_name.clone(),
                        if result.success { "ok" } else { "failed" }.to_string(),
                        cell(result.message.as_deref()),
                    ]
                })
                .collect::<Vec<_>>();
            let mut text = table(&["FILE", "RESULT", "MESSAGE"], &rows);
            text.push_str(&format!(
                "{} of {} files accepted",
                report.succeeded.len(),
                report.total()
            ));
            Ok(text)
        }
    }
}

/// Pretty-printed JSON for `--output json`.
pub(crate) fn to_json(value: &impl Serialize) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))
}

fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths = headers.iter().map(|header| header.len()).collect::<Vec<_>>();
    for row in rows {
        for (width, value) in widths.iter_mut().zip(row) {
            *width = (*width).max(value.chars().count());
        }
    }
    let mut text = String::new();
    let header_cells = headers.iter().map(ToString::to_string).collect::<Vec<_>>();
    for row in std::iter::once(&header_cells).chain(rows) {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(value, width)| format!("{value:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        text.push_str(line.trim_end());
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use talentdesk_api_models::UploadFileResult;
    use talentdesk_core::ListController;

    fn candidates() -> ListController<Candidate> {
        let mut list = ListController::new(2);
        list.ingest(&json!([
            { "id": 1, "name": "Bob", "email": "bob@example.com", "skill": ["Go"] },
            {
                "id": 2, "name": "Ann", "email": "ann@example.com",
                "skill": ["Rust", "SQL"], "status": "Active"
            },
            { "id": 3, "name": "Cy", "email": "cy@example.com" }
        ]));
        list
    }

    #[test]
    fn table_aligns_columns_and_reports_paging() {
        let list = candidates();
        let text = render_list(&list.derived_view(), OutputFormat::Table).unwrap();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "ID  NAME  EMAIL            STATUS  COMPANY  SKILLS");
        assert_eq!(lines[1], "1   Bob   bob@example.com  -       -        Go");
        assert_eq!(lines[2], "2   Ann   ann@example.com  Active  -        Rust, SQL");
        assert_eq!(lines[3], "page 1 of 2 (3 matching, 3 loaded)");
    }

    #[test]
    fn json_list_carries_paging_fields() {
        let mut list = candidates();
        list.set_page(2);
        let text = render_list(&list.derived_view(), OutputFormat::Json).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["page"], 2);
        assert_eq!(value["pageCount"], 2);
        assert_eq!(value["rows"][0]["name"], "Cy");
    }

    #[test]
    fn record_renders_as_labelled_lines() {
        let list = candidates();
        let ann = list.records()[1].clone();
        let text = render_record(&ann, OutputFormat::Table).unwrap();
        assert!(text.contains("name     Ann"));
        assert!(text.contains("skills   Rust, SQL"));
    }

    #[test]
    fn upload_table_lists_every_file() {
        let report = UploadReport::from_results(vec![
            UploadFileResult {
                success: true,
                file_name: "a.pdf".into(),
                message: None,
            },
            UploadFileResult {
                success: false,
                file_name: "b.docx".into(),
                message: Some("unsupported format".into()),
            },
        ]);
        let text = render_upload(&report, OutputFormat::Table).unwrap();
        assert!(text.contains("b.docx  failed  unsupported format"));
        assert!(text.ends_with("1 of 2 files accepted"));
    }
}
