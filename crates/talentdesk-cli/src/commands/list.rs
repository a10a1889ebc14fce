//! `ls`: fetch a collection and render one page of its derived view.

use std::collections::BTreeMap;

use anyhow::anyhow;
use talentdesk_client::{RefreshOutcome, RowActionDispatcher};
use talentdesk_core::{
    Entity, FilterValue, ListController, Listable, SEARCH_KEY, SortDirection, SortSpec,
    parse_timestamp_ms,
};
use tracing::debug;

use crate::cli::{ListArgs, QueryArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{TableRow, render_list};

const DAY_MS: i64 = 86_400_000;

pub(crate) async fn handle_list<T: Entity + TableRow>(
    ctx: &AppContext,
    args: ListArgs,
) -> CliResult<String> {
    let criteria = args.query.criteria()?;
    let dispatcher = load::<T>(ctx).await?;
    dispatcher.update_list(|list| {
        apply_criteria(list, criteria);
        if let Some(key) = args.sort {
            let direction = if args.desc {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            };
            list.set_sort_spec(SortSpec { key, direction });
        }
        if let Some(page_size) = args.page_size {
            list.set_page_size(page_size);
        }
        if let Some(page) = args.page {
            list.set_page(page);
        }
        render_list(&list.derived_view(), ctx.output)
    })
}

/// Fetch the collection for `T` into a fresh dispatcher.
pub(crate) async fn load<T: Entity>(ctx: &AppContext) -> CliResult<RowActionDispatcher<T>> {
    let dispatcher = ctx.dispatcher::<T>();
    match dispatcher.refresh().await {
        RefreshOutcome::Applied(count) => {
            debug!(resource = T::RESOURCE, count, "collection loaded");
            Ok(dispatcher)
        }
        RefreshOutcome::Failed | RefreshOutcome::Stale => {
            Err(CliError::failure(anyhow!("failed to load {}", T::PLURAL)))
        }
    }
}

pub(crate) fn apply_criteria<T: Listable>(
    list: &mut ListController<T>,
    criteria: Vec<(String, FilterValue)>,
) {
    for (key, value) in criteria {
        list.set_filter(key, value);
    }
}

impl QueryArgs {
    /// Filter criteria named by the flags, validated before any request.
    pub(crate) fn criteria(&self) -> CliResult<Vec<(String, FilterValue)>> {
        let mut criteria = Vec::new();
        if let Some(term) = &self.search {
            criteria.push((SEARCH_KEY.to_string(), FilterValue::search(term.as_str())));
        }
        for (key, value) in &self.filters {
            criteria.push((key.clone(), FilterValue::exact(value.as_str())));
        }

        let mut ranges: BTreeMap<&str, (Option<i64>, Option<i64>)> = BTreeMap::new();
        for (key, raw) in &self.from {
            ranges.entry(key.as_str()).or_default().0 = Some(parse_bound(key, raw, false)?);
        }
        for (key, raw) in &self.to {
            ranges.entry(key.as_str()).or_default().1 = Some(parse_bound(key, raw, true)?);
        }
        for (key, (from, to)) in ranges {
            if let (Some(from), Some(to)) = (from, to)
                && from > to
            {
                return Err(CliError::validation(format!(
                    "--from is after --to for {key}"
                )));
            }
            criteria.push((key.to_string(), FilterValue::between(from, to)));
        }
        Ok(criteria)
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.search.is_none()
            && self.filters.is_empty()
            && self.from.is_empty()
            && self.to.is_empty()
    }
}

/// Epoch milliseconds for a date bound; a bare `--to` date covers the whole day.
fn parse_bound(key: &str, raw: &str, end_of_day: bool) -> CliResult<i64> {
    let start = parse_timestamp_ms(raw)
        .ok_or_else(|| CliError::validation(format!("invalid date for {key}: '{raw}'")))?;
    let date_only = raw.trim().len() == "YYYY-MM-DD".len();
    Ok(if end_of_day && date_only {
        start + DAY_MS - 1
    } else {
        start
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Command, EntityKind, OutputFormat, dispatch};
    use crate::client::tests::context_for;
    use httpmock::prelude::*;
    use serde_json::{Value, json};
    use talentdesk_api_models::Candidate;

    fn list_args(query: QueryArgs) -> ListArgs {
        ListArgs {
            entity: EntityKind::Candidates,
            query,
            sort: None,
            desc: false,
            page: None,
            page_size: None,
        }
    }

    fn roster() -> Value {
        json!({ "result": [
            {
                "id": 1, "name": "Bob", "email": "bob@example.com", "skill": ["Go"],
                "status": "Active", "createdAt": "2024-01-05T10:00:00Z"
            },
            {
                "id": 2, "name": "Ann", "email": "ann@example.com", "skill": ["Rust"],
                "status": "Active", "createdAt": "2024-02-10T09:30:00Z"
            },
            {
                "id": 3, "name": "Cy", "email": "cy@example.com",
                "status": "Rejected", "createdAt": "2024-03-01T00:00:00Z"
            }
        ]})
    }

    #[tokio::test]
    async fn search_narrows_the_rendered_table() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/candidates")
                .header("authorization", "Bearer test-token")
                .header("x-request-id", "trace-test");
            then.status(200).json_body(roster());
        });
        let dir = tempfile::tempdir().unwrap();
        let ctx = context_for(&server.base_url(), dir.path(), OutputFormat::Table);

        let query = QueryArgs {
            search: Some("ann".into()),
            ..QueryArgs::default()
        };
        let text = dispatch(&ctx, Command::Ls(list_args(query))).await.unwrap();

        mock.assert();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("2   Ann"));
        assert_eq!(lines[2], "page 1 of 1 (1 matching, 3 loaded)");
    }

    #[tokio::test]
    async fn sort_and_paging_apply_to_json_output() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/candidates");
            then.status(200).json_body(roster());
        });
        let dir = tempfile::tempdir().unwrap();
        let ctx = context_for(&server.base_url(), dir.path(), OutputFormat::Json);

        let mut args = list_args(QueryArgs {
            filters: vec![("status".into(), "active".into())],
            ..QueryArgs::default()
        });
        args.sort = Some("name".into());
        args.desc = true;
        args.page_size = Some(1);
        args.page = Some(9);
        let text = handle_list::<Candidate>(&ctx, args).await.unwrap();

        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["page"], 2);
        assert_eq!(value["pageCount"], 2);
        assert_eq!(value["totalMatching"], 2);
        assert_eq!(value["rows"][0]["name"], "Ann");
    }

    #[tokio::test]
    async fn failed_fetch_is_a_failure_with_a_notice() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/candidates");
            then.status(503).json_body(json!({ "message": "maintenance window" }));
        });
        let dir = tempfile::tempdir().unwrap();
        let ctx = context_for(&server.base_url(), dir.path(), OutputFormat::Table);

        let err = handle_list::<Candidate>(&ctx, list_args(QueryArgs::default()))
            .await
            .unwrap_err();

        assert_eq!(err.exit_code(), 3);
        let notices = ctx.notices.drain();
        assert_eq!(
            notices[0].message,
            "Failed to load candidates: maintenance window"
        );
    }

    #[test]
    fn date_bounds_cover_whole_days() {
        let query = QueryArgs {
            from: vec![("created_at".into(), "2024-02-01".into())],
            to: vec![("created_at".into(), "2024-02-10".into())],
            ..QueryArgs::default()
        };
        let criteria = query.criteria().unwrap();
        let from = parse_timestamp_ms("2024-02-01").unwrap();
        let to = parse_timestamp_ms("2024-02-11").unwrap() - 1;
        assert_eq!(
            criteria,
            vec![(
                "created_at".to_string(),
                FilterValue::between(Some(from), Some(to))
            )]
        );

        let mut list = ListController::<Candidate>::new(10);
        list.ingest(&roster());
        apply_criteria(&mut list, criteria);
        assert_eq!(list.derived_view().rows[0].name, "Ann");
        assert_eq!(list.derived_view().total_matching, 1);
    }

    #[test]
    fn bad_dates_are_validation_errors() {
        let query = QueryArgs {
            from: vec![("created_at".into(), "last tuesday".into())],
            ..QueryArgs::default()
        };
        assert_eq!(query.criteria().unwrap_err().exit_code(), 2);

        let inverted = QueryArgs {
            from: vec![("created_at".into(), "2024-03-01".into())],
            to: vec![("created_at".into(), "2024-02-01".into())],
            ..QueryArgs::default()
        };
        assert!(inverted.criteria().is_err());
        assert!(QueryArgs::default().is_empty());
    }
}
