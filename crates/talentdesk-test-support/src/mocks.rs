//! Scripted [`Transport`] implementation.
//!
//! Replies, failures, and delays are configured per operation; every call is
//! recorded so tests can assert exactly what went over the wire.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use talentdesk_api_models::UploadMetadata;
use talentdesk_client::{ClientError, Transport, UploadRequest};
use talentdesk_core::RecordId;

/// Transport operation, used to script failures and delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `GET /<resource>`.
    List,
    /// `POST /<resource>`.
    Create,
    /// `PUT /<resource>/{id}`.
    Update,
    /// `DELETE /<resource>/{id}`.
    Delete,
    /// `POST /<resource>/bulk-delete`.
    BulkDelete,
    /// Multipart upload.
    Upload,
}

/// One recorded transport call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    /// List request.
    List {
        /// Resource path.
        resource: String,
    },
    /// Create request.
    Create {
        /// Resource path.
        resource: String,
        /// Request body.
        body: Value,
    },
    /// Update request.
    Update {
        /// Resource path.
        resource: String,
        /// Record id.
        id: RecordId,
        /// Request body.
        body: Value,
    },
    /// Delete request.
    Delete {
        /// Resource path.
        resource: String,
        /// Record id.
        id: RecordId,
    },
    /// Bulk delete request.
    BulkDelete {
        /// Resource path.
        resource: String,
        /// Ids sent in the body.
        ids: Vec<RecordId>,
    },
    /// Upload request.
    Upload {
        /// Endpoint path.
        endpoint: String,
        /// Uploaded file names.
        files: Vec<String>,
        /// Metadata fields.
        metadata: UploadMetadata,
    },
}

impl Call {
    /// Operation this call belongs to.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        match self {
            Self::List { .. } => Operation::List,
            Self::Create { .. } => Operation::Create,
            Self::Update { .. } => Operation::Update,
            Self::Delete { .. } => Operation::Delete,
            Self::BulkDelete { .. } => Operation::BulkDelete,
            Self::Upload { .. } => Operation::Upload,
        }
    }
}

/// One queued list response.
#[derive(Debug, Clone)]
pub struct ListReply {
    /// Payload returned, or `(status, message)` to fail with.
    pub result: Result<Value, (u16, Option<String>)>,
    /// Time to wait before answering.
    pub delay: Duration,
}

impl ListReply {
    /// Immediate successful reply.
    #[must_use]
    pub const fn ok(payload: Value) -> Self {
        Self {
            result: Ok(payload),
            delay: Duration::ZERO,
        }
    }

    /// Reply after `delay`.
    #[must_use]
    pub fn delayed(self, delay: Duration) -> Self {
        Self { delay, ..self }
    }
}

#[derive(Debug, Default)]
struct Script {
    list_queue: VecDeque<ListReply>,
    list_default: Option<Value>,
    replies: HashMap<Operation, Value>,
    failures: HashMap<Operation, (u16, Option<String>)>,
    delays: HashMap<Operation, Duration>,
    calls: Vec<Call>,
}

/// Transport that answers from a script instead of the network.
#[derive(Debug, Default)]
pub struct MockTransport {
    script: Mutex<Script>,
}

impl MockTransport {
    /// Transport answering every list with `[]` and every write with `{}`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport whose list calls return `payload` unless a reply is queued.
    #[must_use]
    pub fn serving(payload: Value) -> Self {
        let transport = Self::new();
        transport.script().list_default = Some(payload);
        transport
    }

    /// Queue a one-off list reply, consumed in FIFO order.
    pub fn queue_list(&self, reply: ListReply) {
        self.script().list_queue.push_back(reply);
    }

    /// Response body for create, update, or upload calls.
    pub fn reply(&self, operation: Operation, body: Value) {
        self.script().replies.insert(operation, body);
    }

    /// Fail every call of `operation` with an HTTP status.
    pub fn fail(&self, operation: Operation, status: u16, message: Option<&str>) {
        self.script()
            .failures
            .insert(operation, (status, message.map(str::to_string)));
    }

    /// Stop failing `operation`.
    pub fn recover(&self, operation: Operation) {
        self.script().failures.remove(&operation);
    }

    /// Delay every call of `operation`.
    pub fn delay(&self, operation: Operation, delay: Duration) {
        self.script().delays.insert(operation, delay);
    }

    /// Every call made so far.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.script().calls.clone()
    }

    /// Number of calls made for `operation`.
    #[must_use]
    pub fn count(&self, operation: Operation) -> usize {
        self.script()
            .calls
            .iter()
            .filter(|call| call.operation() == operation)
            .count()
    }

    /// Total number of calls made.
    #[must_use]
    pub fn total_calls(&self) -> usize {
        self.script().calls.len()
    }

    fn script(&self) -> std::sync::MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn plan(&self, call: Call, fallback: Value) -> (Duration, Result<Value, ClientError>) {
        let mut script = self.script();
        let operation = call.operation();
        script.calls.push(call);
        let delay = script.delays.get(&operation).copied().unwrap_or_default();
        if let Some((status, message)) = script.failures.get(&operation).cloned() {
            return (delay, Err(ClientError::Status { status, message }));
        }
        let body = script.replies.get(&operation).cloned().unwrap_or(fallback);
        (delay, Ok(body))
    }

    async fn answer(&self, call: Call, fallback: Value) -> Result<Value, ClientError> {
        let (delay, result) = self.plan(call, fallback);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn list(&self, resource: &str) -> Result<Value, ClientError> {
        let (delay, result) = {
            let mut script = self.script();
            script.calls.push(Call::List {
                resource: resource.to_string(),
            });
            let base_delay = script.delays.get(&Operation::List).copied().unwrap_or_default();
            if let Some(reply) = script.list_queue.pop_front() {
                let result = reply
                    .result
                    .map_err(|(status, message)| ClientError::Status { status, message });
                (base_delay + reply.delay, result)
            } else if let Some((status, message)) = script.failures.get(&Operation::List).cloned() {
                (base_delay, Err(ClientError::Status { status, message }))
            } else {
                let payload = script.list_default.clone().unwrap_or_else(|| json!([]));
                (base_delay, Ok(payload))
            }
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result
    }

    async fn create(&self, resource: &str, body: &Value) -> Result<Value, ClientError> {
        let call = Call::Create {
            resource: resource.to_string(),
            body: body.clone(),
        };
        self.answer(call, json!({})).await
    }

    async fn update(
        &self,
        resource: &str,
        id: &RecordId,
        body: &Value,
    ) -> Result<Value, ClientError> {
        let call = Call::Update {
            resource: resource.to_string(),
            id: id.clone(),
            body: body.clone(),
        };
        self.answer(call, json!({})).await
    }

    async fn delete(&self, resource: &str, id: &RecordId) -> Result<(), ClientError> {
        let call = Call::Delete {
            resource: resource.to_string(),
            id: id.clone(),
        };
        self.answer(call, Value::Null).await.map(drop)
    }

    async fn bulk_delete(&self, resource: &str, ids: &[RecordId]) -> Result<(), ClientError> {
        let call = Call::BulkDelete {
            resource: resource.to_string(),
            ids: ids.to_vec(),
        };
        self.answer(call, Value::Null).await.map(drop)
    }

    async fn upload(&self, endpoint: &str, request: &UploadRequest) -> Result<Value, ClientError> {
        let call = Call::Upload {
            endpoint: endpoint.to_string(),
            files: request.files.iter().map(|file| file.file_name.clone()).collect(),
            metadata: request.metadata.clone(),
        };
        self.answer(call, json!([])).await
    }
}
