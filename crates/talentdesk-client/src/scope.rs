//! View-bound fetch lifetimes.
//!
//! A [`ViewScope`] owns the fetches a screen started. Dropping it (the user
//! navigated away) aborts whatever is still in flight. Mutations are never
//! registered here: they must finish even after the view is gone.

use std::future::Future;

use talentdesk_core::Entity;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::dispatcher::RowActionDispatcher;

/// Fetch tasks tied to one view.
#[derive(Debug, Default)]
pub struct ViewScope {
    tasks: Vec<JoinHandle<()>>,
}

impl ViewScope {
    /// Scope with nothing in flight.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` until it finishes or the scope is dropped.
    pub fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.prune();
        self.tasks.push(tokio::spawn(task));
    }

    /// Start a refresh owned by this scope.
    pub fn refresh<T: Entity>(&mut self, dispatcher: &RowActionDispatcher<T>) {
        let dispatcher = dispatcher.clone();
        self.spawn(async move {
            let outcome = dispatcher.refresh().await;
            debug!(resource = T::RESOURCE, ?outcome, "scoped refresh finished");
        });
    }

    /// Tasks that have not finished yet.
    pub fn in_flight(&mut self) -> usize {
        self.prune();
        self.tasks.len()
    }

    /// Abort every task still in flight.
    pub fn cancel_all(&mut self) {
        self.prune();
        let cancelled = self.tasks.len();
        for task in self.tasks.drain(..) {
            task.abort();
        }
        if cancelled > 0 {
            debug!(cancelled, "view scope cancelled in-flight fetches");
        }
    }

    fn prune(&mut self) {
        self.tasks.retain(|task| !task.is_finished());
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
