//! Row actions with optimistic local updates.
//!
//! # Design
//! - Each mutation applies locally first (`Pending`), then calls the server,
//!   then either keeps the change (`Committed`) or restores the snapshot
//!   (`RolledBack`). There is no automatic retry.
//! - The remote call and its commit/rollback run on a spawned task. Dropping
//!   the caller's future never leaves a half-applied change behind.
//! - The controller lock is never held across an await.
//! - Every failure is returned and also sent to the [`NoticeSink`].

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::{Map, Value};
use talentdesk_api_models::{UploadReport, decode_upload_results};
use talentdesk_core::{Entity, FetchOutcome, ListController, Listable, RecordId, record_item};
use tracing::{debug, warn};

use crate::error::ActionError;
use crate::notice::{Notice, NoticeSink};
use crate::transport::{Transport, UploadRequest};

/// Controller shared between a view and its dispatcher.
pub type SharedList<T> = Arc<Mutex<ListController<T>>>;

/// Result of a row action.
pub type ActionResult<T> = Result<T, ActionError>;

/// New shared controller with the given page size.
#[must_use]
pub fn shared_list<T: Listable>(page_size: usize) -> SharedList<T> {
    Arc::new(Mutex::new(ListController::new(page_size)))
}

/// Outcome of [`RowActionDispatcher::refresh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The collection was replaced with this many records.
    Applied(usize),
    /// A newer refresh was started; this response was discarded.
    Stale,
    /// The fetch failed and the list now shows an empty collection. The
    /// selection is left untouched.
    Failed,
}

/// Lifecycle of one optimistic mutation, recorded in trace events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationState {
    /// Nothing applied yet.
    Idle,
    /// Applied locally, waiting on the server.
    Pending,
    /// Server accepted the change.
    Committed,
    /// Server refused the change; the local state was restored.
    RolledBack,
}

impl MutationState {
    /// Label used in trace events.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pending => "pending",
            Self::Committed => "committed",
            Self::RolledBack => "rolled_back",
        }
    }
}

/// Runs row actions for one entity type against a shared controller.
pub struct RowActionDispatcher<T> {
    list: SharedList<T>,
    transport: Arc<dyn Transport>,
    notices: Arc<dyn NoticeSink>,
}

impl<T> Clone for RowActionDispatcher<T> {
    fn clone(&self) -> Self {
        Self {
            list: Arc::clone(&self.list),
            transport: Arc::clone(&self.transport),
            notices: Arc::clone(&self.notices),
        }
    }
}

impl<T: Entity> RowActionDispatcher<T> {
    /// Dispatcher over `list`, calling `transport` and reporting to `notices`.
    #[must_use]
    pub fn new(
        list: SharedList<T>,
        transport: Arc<dyn Transport>,
        notices: Arc<dyn NoticeSink>,
    ) -> Self {
        Self {
            list,
            transport,
            notices,
        }
    }

    /// Shared controller handle.
    #[must_use]
    pub const fn list(&self) -> &SharedList<T> {
        &self.list
    }

    /// Read the controller under its lock.
    pub fn read<R>(&self, read: impl FnOnce(&ListController<T>) -> R) -> R {
        read(&lock(&self.list))
    }

    /// Change controller state (filters, sort, selection) under its lock.
    pub fn update_list<R>(&self, update: impl FnOnce(&mut ListController<T>) -> R) -> R {
        update(&mut lock(&self.list))
    }

    /// Refetch the collection.
    ///
    /// A failed fetch shows an empty collection and an error notice but keeps
    /// the selection; a response overtaken by a newer refresh is discarded.
    pub async fn refresh(&self) -> RefreshOutcome {
        let ticket = lock(&self.list).begin_fetch();
        let result = self.transport.list(T::RESOURCE).await;
        match result {
            Ok(payload) => {
                let outcome = lock(&self.list).ingest_fetched(ticket, &payload);
                match outcome {
                    FetchOutcome::Applied { records } => {
                        debug!(resource = T::RESOURCE, records, "collection refreshed");
                        RefreshOutcome::Applied(records)
                    }
                    FetchOutcome::Stale => RefreshOutcome::Stale,
                }
            }
            Err(err) => {
                let outcome = lock(&self.list).fail_fetch(ticket);
                match outcome {
                    FetchOutcome::Stale => RefreshOutcome::Stale,
                    FetchOutcome::Applied { .. } => {
                        self.notices.notify(Notice::error(format!(
                            "Failed to load {}: {}",
                            T::PLURAL,
                            err.user_message()
                        )));
                        RefreshOutcome::Failed
                    }
                }
            }
        }
    }

    /// Merge `patch` into one record locally, then `PUT` the patch.
    ///
    /// The patch is a JSON merge patch over the record's serialized form and
    /// is sent to the server unchanged, so fields it does not name are left
    /// alone. The local change is reverted if the server refuses it, unless
    /// the record was replaced meanwhile (for example by a refetch).
    ///
    /// # Errors
    ///
    /// [`ActionError::Validation`] when the record is not loaded or the patch
    /// does not produce a valid record (no request is sent), otherwise
    /// [`ActionError::Transport`] when the server refuses the update.
    pub async fn mutate_one(&self, id: RecordId, patch: Value) -> ActionResult<T> {
        let body = match patch {
            Value::Object(fields) if fields.is_empty() => {
                return Err(self.reject("patch has no fields"));
            }
            body @ Value::Object(_) => body,
            _ => return Err(self.reject("patch must be a JSON object")),
        };
        let current = lock(&self.list).record(&id).cloned();
        let Some(previous) = current else {
            return Err(self.reject(format!("{} {id} is not loaded", T::LABEL)));
        };
        let next = match patched(&previous, &body) {
            Ok(next) => next,
            Err(message) => return Err(self.reject(message)),
        };

        lock(&self.list).replace(&id, next.clone());
        debug!(
            resource = T::RESOURCE,
            %id,
            state = MutationState::Pending.as_str(),
            "optimistic update applied"
        );

        let this = self.clone();
        run_detached(async move {
            let result = this.transport.update(T::RESOURCE, &id, &body).await;
            match result {
                Ok(response) => {
                    let confirmed = T::deserialize(record_item(&response))
                        .ok()
                        .filter(|server| server.id() == &id);
                    let kept = {
                        let mut list = lock(&this.list);
                        match confirmed {
                            Some(server) if list.record(&id) == Some(&next) => {
                                list.replace(&id, server.clone());
                                server
                            }
                            _ => next,
                        }
                    };
                    debug!(
                        resource = T::RESOURCE,
                        %id,
                        state = MutationState::Committed.as_str(),
                        "update committed"
                    );
                    this.notices
                        .notify(Notice::success(format!("{} updated", capitalized(T::LABEL))));
                    Ok(kept)
                }
                Err(err) => {
                    let reverted = {
                        let mut list = lock(&this.list);
                        list.record(&id) == Some(&next) && list.replace(&id, previous).is_some()
                    };
                    debug!(
                        resource = T::RESOURCE,
                        %id,
                        reverted,
                        state = MutationState::RolledBack.as_str(),
                        "update rolled back"
                    );
                    Err(this.fail(&format!("Failed to update {}", T::LABEL), err.into()))
                }
            }
        })
        .await
    }

    /// Remove one record locally, then `DELETE` it.
    ///
    /// # Errors
    ///
    /// [`ActionError::Validation`] when the record is not loaded, otherwise
    /// [`ActionError::Transport`] after re-inserting the record at its
    /// original position.
    pub async fn delete_one(&self, id: RecordId) -> ActionResult<()> {
        let removed = lock(&self.list).remove(&id);
        let Some(removed) = removed else {
            return Err(self.reject(format!("{} {id} is not loaded", T::LABEL)));
        };
        debug!(
            resource = T::RESOURCE,
            %id,
            state = MutationState::Pending.as_str(),
            "optimistic delete applied"
        );

        let this = self.clone();
        run_detached(async move {
            let result = this.transport.delete(T::RESOURCE, &id).await;
            match result {
                Ok(()) => {
                    debug!(
                        resource = T::RESOURCE,
                        %id,
                        state = MutationState::Committed.as_str(),
                        "delete committed"
                    );
                    this.notices
                        .notify(Notice::success(format!("{} deleted", capitalized(T::LABEL))));
                    Ok(())
                }
                Err(err) => {
                    let restored = lock(&this.list).restore(removed);
                    debug!(
                        resource = T::RESOURCE,
                        %id,
                        restored,
                        state = MutationState::RolledBack.as_str(),
                        "delete rolled back"
                    );
                    Err(this.fail(&format!("Failed to delete {}", T::LABEL), err.into()))
                }
            }
        })
        .await
    }

    /// Remove several records locally, then delete them in one bulk call.
    ///
    /// Returns the number of records deleted. A failure restores the whole
    /// batch at its original positions.
    ///
    /// # Errors
    ///
    /// [`ActionError::Validation`] for an empty id list ("no records
    /// selected") or when none of the ids are loaded; no request is sent.
    /// [`ActionError::Transport`] when the bulk call fails.
    pub async fn delete_many(&self, ids: &[RecordId]) -> ActionResult<usize> {
        if ids.is_empty() {
            return Err(self.reject("no records selected"));
        }
        let removed = lock(&self.list).remove_many(ids);
        if removed.is_empty() {
            return Err(self.reject(format!("none of the selected {} are loaded", T::PLURAL)));
        }
        let wire_ids: Vec<RecordId> = removed
            .iter()
            .map(|entry| entry.record.id().clone())
            .collect();
        debug!(
            resource = T::RESOURCE,
            count = wire_ids.len(),
            state = MutationState::Pending.as_str(),
            "optimistic bulk delete applied"
        );

        let this = self.clone();
        run_detached(async move {
            let result = this.transport.bulk_delete(T::RESOURCE, &wire_ids).await;
            match result {
                Ok(()) => {
                    let count = wire_ids.len();
                    debug!(
                        resource = T::RESOURCE,
                        count,
                        state = MutationState::Committed.as_str(),
                        "bulk delete committed"
                    );
                    this.notices
                        .notify(Notice::success(format!("Deleted {count} {}", noun::<T>(count))));
                    Ok(count)
                }
                Err(err) => {
                    let restored = lock(&this.list).restore_many(removed);
                    debug!(
                        resource = T::RESOURCE,
                        restored,
                        state = MutationState::RolledBack.as_str(),
                        "bulk delete rolled back"
                    );
                    Err(this.fail(&format!("Failed to delete {}", T::PLURAL), err.into()))
                }
            }
        })
        .await
    }

    /// Bulk-delete whatever is currently selected.
    ///
    /// # Errors
    ///
    /// See [`Self::delete_many`].
    pub async fn delete_selected(&self) -> ActionResult<usize> {
        let ids = lock(&self.list).selected_ids();
        self.delete_many(&ids).await
    }

    /// `POST` a new record, then refetch the collection.
    ///
    /// Nothing is inserted locally; the refetched collection is
    /// authoritative. Returns the created record when the response carries
    /// one that decodes.
    ///
    /// # Errors
    ///
    /// [`ActionError::Validation`] for a non-object or empty payload,
    /// [`ActionError::Transport`] when the server refuses it.
    pub async fn create_one(&self, payload: Value) -> ActionResult<Option<T>> {
        if !payload.as_object().is_some_and(|fields| !fields.is_empty()) {
            return Err(self.reject("payload must be a non-empty JSON object"));
        }
        let this = self.clone();
        run_detached(async move {
            let result = this.transport.create(T::RESOURCE, &payload).await;
            match result {
                Ok(response) => {
                    let created = match T::deserialize(record_item(&response)) {
                        Ok(record) => Some(record),
                        Err(err) => {
                            debug!(
                                resource = T::RESOURCE,
                                error = %err,
                                "create response carried no record"
                            );
                            None
                        }
                    };
                    this.notices
                        .notify(Notice::success(format!("{} created", capitalized(T::LABEL))));
                    this.refresh().await;
                    Ok(created)
                }
                Err(err) => Err(this.fail(&format!("Failed to create {}", T::LABEL), err.into())),
            }
        })
        .await
    }

    /// Upload files to `endpoint` and report per-file outcomes.
    ///
    /// One notice summarizes the accepted files and one error notice is sent
    /// per rejected file. The collection is refetched when anything was
    /// accepted.
    ///
    /// # Errors
    ///
    /// [`ActionError::Validation`] when no files are given,
    /// [`ActionError::Transport`] when the upload call fails, and
    /// [`ActionError::Decode`] when the response is not a list of results.
    pub async fn upload(
        &self,
        endpoint: &str,
        request: UploadRequest,
    ) -> ActionResult<UploadReport> {
        if request.files.is_empty() {
            return Err(self.reject("no files selected"));
        }
        let endpoint = endpoint.to_string();
        let this = self.clone();
        run_detached(async move {
            let response = match this.transport.upload(&endpoint, &request).await {
                Ok(response) => response,
                Err(err) => return Err(this.fail("Upload failed", err.into())),
            };
            let results = match decode_upload_results(&response) {
                Ok(results) => results,
                Err(err) => {
                    return Err(this.fail(
                        "Upload failed",
                        ActionError::Decode {
                            message: format!("unexpected upload response: {err}"),
                        },
                    ));
                }
            };
            let report = UploadReport::from_results(results);
            if !report.succeeded.is_empty() {
                this.notices.notify(Notice::success(format!(
                    "Uploaded {} of {} files",
                    report.succeeded.len(),
                    report.total()
                )));
            }
            for failed in &report.failed {
                this.notices.notify(Notice::error(format!(
                    "{}: {}",
                    failed.file_name,
                    failed.message.as_deref().unwrap_or("upload failed")
                )));
            }
            if report.total() == 0 {
                this.notices.notify(Notice::info("No files were processed"));
            }
            if !report.succeeded.is_empty() {
                this.refresh().await;
            }
            Ok(report)
        })
        .await
    }

    fn reject(&self, message: impl Into<String>) -> ActionError {
        let err = ActionError::validation(message);
        self.notices.notify(Notice::error(err.to_string()));
        err
    }

    fn fail(&self, context: &str, err: ActionError) -> ActionError {
        self.notices.notify(Notice::error(format!("{context}: {err}")));
        err
    }
}

/// Apply an RFC 7386 JSON merge patch to `target`.
///
/// `null` members delete keys, objects merge recursively, anything else
/// replaces the target value.
pub fn merge_patch(target: &mut Value, patch: &Value) {
    let Value::Object(members) = patch else {
        *target = patch.clone();
        return;
    };
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    if let Value::Object(existing) = target {
        for (key, value) in members {
            if value.is_null() {
                existing.remove(key);
            } else {
                merge_patch(existing.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
    }
}

fn patched<T: Entity>(current: &T, patch: &Value) -> Result<T, String> {
    let mut value = serde_json::to_value(current).map_err(|err| err.to_string())?;
    merge_patch(&mut value, patch);
    let next: T =
        serde_json::from_value(value).map_err(|err| format!("invalid {} patch: {err}", T::LABEL))?;
    if next.id() != current.id() {
        return Err(format!("{} id cannot be changed", T::LABEL));
    }
    Ok(next)
}

fn lock<T>(list: &SharedList<T>) -> MutexGuard<'_, ListController<T>> {
    list.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn run_detached<R, F>(action: F) -> ActionResult<R>
where
    R: Send + 'static,
    F: Future<Output = ActionResult<R>> + Send + 'static,
{
    match tokio::spawn(action).await {
        Ok(result) => result,
        Err(err) => {
            warn!(error = %err, "row action task did not complete");
            Err(ActionError::Interrupted)
        }
    }
}

fn capitalized(label: &str) -> String {
    let mut chars = label.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

const fn noun<T: Entity>(count: usize) -> &'static str {
    if count == 1 { T::LABEL } else { T::PLURAL }
}
