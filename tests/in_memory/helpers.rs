//! Shared test helpers for in-memory board integration tests.

use async_trait::async_trait;
use mockable::DefaultClock;
use rstest::fixture;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use taskboard::board::{
    adapters::{fallback::FallbackDataset, memory::InMemoryTaskStore},
    domain::{ActorId, ProjectId, SessionContext, TaskId, TaskRecord},
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
    services::SyncEngine,
};
use taskboard::config::SyncConfig;
use tokio::sync::{mpsc, oneshot};

/// Builds a record assigned to `alice` in project `P-1`.
///
/// # Panics
///
/// Panics if `id` is blank.
pub fn task(id: &str, status: &str) -> TaskRecord {
    TaskRecord::new(TaskId::new(id).expect("valid task id"), format!("Task {id}"))
        .with_status(status)
        .with_assignee(ActorId::new("alice").expect("valid actor id"))
        .with_project(ProjectId::new("P-1").expect("valid project id"))
}

/// Parses a task identifier.
///
/// # Panics
///
/// Panics if `id` is blank.
pub fn task_id(id: &str) -> TaskId {
    TaskId::new(id).expect("valid task id")
}

/// Provides the session used by most scenarios: `alice` viewing `P-1`.
#[fixture]
pub fn session() -> SessionContext {
    SessionContext::new(ActorId::new("alice").expect("valid actor id"))
        .with_project(ProjectId::new("P-1").expect("valid project id"))
}

/// Provides a store seeded with one task per column.
#[fixture]
pub fn store() -> InMemoryTaskStore {
    InMemoryTaskStore::with_records([
        task("T-1", "To Do"),
        task("T-2", "In Progress"),
        task("T-3", "Done"),
    ])
}

/// Builds an engine over a store with the built-in fallback dataset.
pub fn engine<S>(store: Arc<S>, config: SyncConfig) -> SyncEngine<S, DefaultClock>
where
    S: TaskStore + 'static,
{
    SyncEngine::new(
        store,
        Arc::new(DefaultClock),
        Arc::new(FallbackDataset::builtin()),
        config,
    )
}

/// Store that reads its data on entry, then holds the response until the
/// test releases it.
///
/// Only `fetch_all_tasks` is gated; each call consumes the next gate in
/// order. Calls beyond the prepared gates complete immediately.
pub struct GatedStore {
    inner: InMemoryTaskStore,
    gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    entered: mpsc::UnboundedSender<()>,
}

/// Handles for driving a [`GatedStore`].
pub struct GateControl {
    /// Receives one message each time a gated call has read its data.
    pub entered: mpsc::UnboundedReceiver<()>,
    /// Releases gated calls, in call order.
    pub releases: VecDeque<oneshot::Sender<()>>,
}

impl GatedStore {
    /// Wraps a store with `gates` gated reads.
    pub fn new(inner: InMemoryTaskStore, gates: usize) -> (Self, GateControl) {
        let (entered_tx, entered_rx) = mpsc::unbounded_channel();
        let (senders, receivers): (VecDeque<_>, VecDeque<_>) =
            (0..gates).map(|_| oneshot::channel()).unzip();
        let store = Self {
            inner,
            gates: Mutex::new(receivers),
            entered: entered_tx,
        };
        let control = GateControl {
            entered: entered_rx,
            releases: senders,
        };
        (store, control)
    }

    fn next_gate(&self) -> TaskStoreResult<Option<oneshot::Receiver<()>>> {
        let mut gates = self
            .gates
            .lock()
            .map_err(|err| TaskStoreError::transport_message(err.to_string()))?;
        Ok(gates.pop_front())
    }
}

#[async_trait]
impl TaskStore for GatedStore {
    async fn fetch_tasks_by_project(
        &self,
        project: &ProjectId,
    ) -> TaskStoreResult<Vec<TaskRecord>> {
        self.inner.fetch_tasks_by_project(project).await
    }

    async fn fetch_tasks_by_assignee(&self, owner: &ActorId) -> TaskStoreResult<Vec<TaskRecord>> {
        self.inner.fetch_tasks_by_assignee(owner).await
    }

    async fn fetch_all_tasks(&self) -> TaskStoreResult<Vec<TaskRecord>> {
        let records = self.inner.fetch_all_tasks().await?;
        if let Some(gate) = self.next_gate()? {
            let _sent = self.entered.send(());
            gate.await
                .map_err(|err| TaskStoreError::transport_message(err.to_string()))?;
        }
        Ok(records)
    }

    async fn update_task_status(&self, task_id: &TaskId, new_status: &str) -> TaskStoreResult<()> {
        self.inner.update_task_status(task_id, new_status).await
    }

    async fn fetch_task_by_id(&self, task_id: &TaskId) -> TaskStoreResult<TaskRecord> {
        self.inner.fetch_task_by_id(task_id).await
    }
}
