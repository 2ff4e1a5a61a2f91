//! In-memory task store for tests, demos and failure drills.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::board::{
    domain::{ActorId, MalformedDataError, ProjectId, TaskId, TaskRecord},
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
};

/// Task store operations, used to inject failures and count calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    /// [`TaskStore::fetch_tasks_by_project`].
    FetchByProject,
    /// [`TaskStore::fetch_tasks_by_assignee`].
    FetchByAssignee,
    /// [`TaskStore::fetch_all_tasks`].
    FetchAll,
    /// [`TaskStore::update_task_status`].
    UpdateStatus,
    /// [`TaskStore::fetch_task_by_id`].
    FetchById,
}

/// Failure returned by an operation until it is cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectedFailure {
    /// Fail with a transport error carrying this message.
    Transport(String),
    /// Fail as if the response body did not decode.
    Malformed,
}

impl InjectedFailure {
    fn to_error(&self) -> TaskStoreError {
        match self {
            Self::Transport(message) => TaskStoreError::transport_message(message.clone()),
            Self::Malformed => TaskStoreError::Malformed(MalformedDataError::NotARecordList {
                found: "a string",
            }),
        }
    }
}

/// Thread-safe in-memory task store.
///
/// Records keep insertion order so boards built from it are deterministic.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    state: Arc<RwLock<InMemoryStoreState>>,
}

#[derive(Debug, Default)]
struct InMemoryStoreState {
    records: Vec<TaskRecord>,
    failures: HashMap<StoreOperation, InjectedFailure>,
    calls: HashMap<StoreOperation, usize>,
}

impl InMemoryTaskStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the given records.
    #[must_use]
    pub fn with_records(records: impl IntoIterator<Item = TaskRecord>) -> Self {
        let state = InMemoryStoreState {
            records: records.into_iter().collect(),
            ..InMemoryStoreState::default()
        };
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Inserts or replaces a record.
    ///
    /// # Errors
    ///
    /// Returns a transport error when the lock is poisoned.
    pub fn upsert(&self, record: TaskRecord) -> TaskStoreResult<()> {
        let mut state = self.write_state()?;
        match state
            .records
            .iter_mut()
            .find(|existing| existing.id() == record.id())
        {
            Some(existing) => *existing = record,
            None => state.records.push(record),
        }
        Ok(())
    }

    /// Makes an operation fail until [`Self::clear_failure`] is called.
    ///
    /// # Errors
    ///
    /// Returns a transport error when the lock is poisoned.
    pub fn fail(&self, operation: StoreOperation, failure: InjectedFailure) -> TaskStoreResult<()> {
        self.write_state()?.failures.insert(operation, failure);
        Ok(())
    }

    /// Restores normal behaviour for an operation.
    ///
    /// # Errors
    ///
    /// Returns a transport error when the lock is poisoned.
    pub fn clear_failure(&self, operation: StoreOperation) -> TaskStoreResult<()> {
        self.write_state()?.failures.remove(&operation);
        Ok(())
    }

    /// Returns how many times an operation has been invoked, including
    /// failed invocations.
    #[must_use]
    pub fn calls(&self, operation: StoreOperation) -> usize {
        self.state
            .read()
            .map(|state| state.calls.get(&operation).copied().unwrap_or_default())
            .unwrap_or_default()
    }

    /// Returns a copy of a stored record.
    #[must_use]
    pub fn record(&self, task_id: &TaskId) -> Option<TaskRecord> {
        self.state.read().ok().and_then(|state| {
            state
                .records
                .iter()
                .find(|record| record.id() == task_id)
                .cloned()
        })
    }

    fn write_state(&self) -> TaskStoreResult<std::sync::RwLockWriteGuard<'_, InMemoryStoreState>> {
        self.state
            .write()
            .map_err(|err| TaskStoreError::transport(std::io::Error::other(err.to_string())))
    }

    /// Records the call and returns the injected failure, if any.
    fn enter(&self, operation: StoreOperation) -> TaskStoreResult<()> {
        let mut state = self.write_state()?;
        *state.calls.entry(operation).or_default() += 1;
        match state.failures.get(&operation) {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }

    fn select(
        &self,
        operation: StoreOperation,
        predicate: impl Fn(&TaskRecord) -> bool,
    ) -> TaskStoreResult<Vec<TaskRecord>> {
        self.enter(operation)?;
        let state = self
            .state
            .read()
            .map_err(|err| TaskStoreError::transport(std::io::Error::other(err.to_string())))?;
        Ok(state
            .records
            .iter()
            .filter(|&record| predicate(record))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn fetch_tasks_by_project(
        &self,
        project: &ProjectId,
    ) -> TaskStoreResult<Vec<TaskRecord>> {
        self.select(StoreOperation::FetchByProject, |record| {
            record.project_id() == Some(project)
        })
    }

    async fn fetch_tasks_by_assignee(&self, owner: &ActorId) -> TaskStoreResult<Vec<TaskRecord>> {
        self.select(StoreOperation::FetchByAssignee, |record| {
            record.assignee_id() == Some(owner)
        })
    }

    async fn fetch_all_tasks(&self) -> TaskStoreResult<Vec<TaskRecord>> {
        self.select(StoreOperation::FetchAll, |_| true)
    }

    async fn update_task_status(&self, task_id: &TaskId, new_status: &str) -> TaskStoreResult<()> {
        self.enter(StoreOperation::UpdateStatus)?;
        let mut state = self.write_state()?;
        let record = state
            .records
            .iter_mut()
            .find(|record| record.id() == task_id)
            .ok_or_else(|| TaskStoreError::NotFound(task_id.clone()))?;
        *record = record.with_replaced_status(new_status);
        Ok(())
    }

    async fn fetch_task_by_id(&self, task_id: &TaskId) -> TaskStoreResult<TaskRecord> {
        self.enter(StoreOperation::FetchById)?;
        self.record(task_id)
            .ok_or_else(|| TaskStoreError::NotFound(task_id.clone()))
    }
}
