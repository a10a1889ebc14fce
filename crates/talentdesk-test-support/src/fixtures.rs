//! Sample records and a ready-wired dispatcher.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Value, json};
use talentdesk_api_models::Candidate;
use talentdesk_client::{NoticeLog, NoticeSink, RowActionDispatcher, Transport, shared_list};
use talentdesk_core::{DEFAULT_PAGE_SIZE, Entity, RecordId};

use crate::mocks::MockTransport;

/// Candidate with only an id, a name, and a derived email.
#[must_use]
pub fn candidate(id: i64, name: &str) -> Candidate {
    Candidate {
        id: RecordId::from(id),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        skill: Vec::new(),
        current_company: None,
        role: None,
        agency_id: None,
        status: Some("New".to_string()),
        experience_years: None,
        education: None,
        address: None,
        created_at: None,
        updated_at: None,
    }
}

/// Candidates `1..=count`, named `Candidate 01`, `Candidate 02`, ...
#[must_use]
pub fn candidates(count: i64) -> Vec<Candidate> {
    (1..=count)
        .map(|id| candidate(id, &format!("Candidate {id:02}")))
        .collect()
}

/// `{ "result": [...] }` envelope around serialized records.
#[must_use]
pub fn result_payload<T: Serialize>(records: &[T]) -> Value {
    json!({ "result": records })
}

/// The two-record collection used by the search scenario.
#[must_use]
pub fn bob_and_ann() -> Value {
    json!([
        { "id": 1, "name": "Bob", "skill": ["Go"] },
        { "id": 2, "name": "Ann", "skill": ["Rust"] }
    ])
}

/// Dispatcher wired to a [`MockTransport`] and a [`NoticeLog`].
pub struct Harness<T> {
    /// Dispatcher under test.
    pub dispatcher: RowActionDispatcher<T>,
    /// Scripted transport behind the dispatcher.
    pub transport: Arc<MockTransport>,
    /// Notices the dispatcher emitted.
    pub notices: Arc<NoticeLog>,
}

impl<T: Entity> Harness<T> {
    /// Harness with an empty list.
    #[must_use]
    pub fn new(transport: MockTransport) -> Self {
        let transport = Arc::new(transport);
        let notices = Arc::new(NoticeLog::new());
        let remote: Arc<dyn Transport> = transport.clone();
        let sink: Arc<dyn NoticeSink> = notices.clone();
        let dispatcher = RowActionDispatcher::new(shared_list(DEFAULT_PAGE_SIZE), remote, sink);
        Self {
            dispatcher,
            transport,
            notices,
        }
    }

    /// Harness whose list already holds `records`.
    #[must_use]
    pub fn loaded(transport: MockTransport, records: Vec<T>) -> Self {
        let harness = Self::new(transport);
        harness.dispatcher.update_list(|list| list.ingest_rows(records));
        harness
    }

    /// Notice texts in the order they were sent, rendered as `kind: message`.
    #[must_use]
    pub fn notice_lines(&self) -> Vec<String> {
        self.notices
            .snapshot()
            .iter()
            .map(ToString::to_string)
            .collect()
    }
}
