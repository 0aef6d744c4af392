//! Mutation gateway
//!
//! Callers hand mutations to a background worker and return immediately; the
//! optimistic state already shows the change. Each finished mutation emits an
//! [`Invalidation`], which tells the UI to re-fetch the board and confirm it.
//!
//! Failures are logged and reported in the invalidation. Nothing is retried
//! and no optimistic state is rolled back here.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::board::MovePlan;
use crate::db::{BoardSnapshot, Result};
use crate::model::{ColumnKind, Context, Task};
use crate::store::BoardStore;

/// A write against the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    CreateTask(Task),
    UpdateTask(Task),
    DeleteTask(String),
    CreateContext(Context),
    UpdateColumnTitle {
        id: String,
        title: String,
        kind: ColumnKind,
    },
    /// Upsert changed tasks, then write the dense order in one batch
    Move(MovePlan),
}

impl Mutation {
    /// Short name used in logs and events
    pub fn label(&self) -> &'static str {
        match self {
            Mutation::CreateTask(_) => "create_task",
            Mutation::UpdateTask(_) => "update_task",
            Mutation::DeleteTask(_) => "delete_task",
            Mutation::CreateContext(_) => "create_context",
            Mutation::UpdateColumnTitle { .. } => "update_column_title",
            Mutation::Move(_) => "move",
        }
    }

    /// Run this mutation synchronously
    pub fn apply<S: BoardStore + ?Sized>(&self, store: &S) -> Result<()> {
        match self {
            Mutation::CreateTask(task) => store.create_task(task).map(|_| ()),
            Mutation::UpdateTask(task) => store.update_task(task).map(|_| ()),
            Mutation::DeleteTask(id) => store.delete_task(id),
            Mutation::CreateContext(context) => store.create_context(context).map(|_| ()),
            Mutation::UpdateColumnTitle { id, title, kind } => {
                store.update_column_title(id, title, *kind)
            }
            Mutation::Move(plan) => {
                for task in &plan.updates {
                    store.update_task(task)?;
                }
                store.reorder_batch(&plan.ordered)
            }
        }
    }
}

/// Signal that persisted state may have changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invalidation {
    pub mutation: &'static str,
    /// Set when the store rejected the mutation
    pub error: Option<String>,
}

/// Fire-and-forget front door to a [`BoardStore`]
pub struct Gateway<S: BoardStore> {
    store: Arc<S>,
    requests: Option<Sender<Mutation>>,
    invalidations: Receiver<Invalidation>,
    worker: Option<JoinHandle<()>>,
}

impl<S: BoardStore> Gateway<S> {
    /// Start the worker thread. Mutations run one at a time in submission
    /// order.
    pub fn spawn(store: S) -> std::io::Result<Self> {
        let store = Arc::new(store);
        let (request_tx, request_rx) = mpsc::channel::<Mutation>();
        let (event_tx, event_rx) = mpsc::channel::<Invalidation>();

        let worker_store = Arc::clone(&store);
        let worker = std::thread::Builder::new()
            .name("lanes-gateway".to_string())
            .spawn(move || run_worker(worker_store.as_ref(), request_rx, event_tx))?;

        Ok(Self {
            store,
            requests: Some(request_tx),
            invalidations: event_rx,
            worker: Some(worker),
        })
    }

    /// Queue a mutation without waiting for it
    pub fn submit(&self, mutation: Mutation) {
        tracing::debug!(mutation = mutation.label(), "mutation submitted");
        let Some(requests) = &self.requests else {
            return;
        };
        if let Err(e) = requests.send(mutation) {
            tracing::error!("gateway worker is gone, dropping {}", e.0.label());
        }
    }

    /// Read the authoritative board
    pub fn fetch(&self) -> Result<BoardSnapshot> {
        self.store.fetch_all()
    }

    /// Next invalidation if one is ready
    pub fn try_invalidation(&self) -> Option<Invalidation> {
        self.invalidations.try_recv().ok()
    }

    /// Wait up to `timeout` for the next invalidation
    pub fn wait_invalidation(&self, timeout: Duration) -> Option<Invalidation> {
        match self.invalidations.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: BoardStore> Drop for Gateway<S> {
    fn drop(&mut self) {
        // Closing the queue lets the worker drain and exit
        self.requests.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::error!("gateway worker panicked");
            }
        }
    }
}

fn run_worker<S: BoardStore + ?Sized>(
    store: &S,
    requests: Receiver<Mutation>,
    events: Sender<Invalidation>,
) {
    for mutation in requests {
        let label = mutation.label();
        let error = match mutation.apply(store) {
            Ok(()) => {
                tracing::debug!(mutation = label, "mutation persisted");
                None
            }
            Err(e) => {
                tracing::error!(mutation = label, error = %e, "mutation failed");
                Some(e.to_string())
            }
        };
        // UI may already be gone during shutdown
        let _ = events.send(Invalidation {
            mutation: label,
            error,
        });
    }
}
