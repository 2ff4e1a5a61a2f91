//! Port for the remote task store that owns task records.

use crate::board::domain::{ActorId, MalformedDataError, ProjectId, TaskId, TaskRecord};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Remote system of record for task records.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Returns the tasks of a project.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Transport`] when the store cannot be reached
    /// and [`TaskStoreError::Malformed`] when the response does not decode.
    async fn fetch_tasks_by_project(
        &self,
        project: &ProjectId,
    ) -> TaskStoreResult<Vec<TaskRecord>>;

    /// Returns the tasks assigned to an actor.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Transport`] when the store cannot be reached
    /// and [`TaskStoreError::Malformed`] when the response does not decode.
    async fn fetch_tasks_by_assignee(&self, owner: &ActorId) -> TaskStoreResult<Vec<TaskRecord>>;

    /// Returns every task visible to the client.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Transport`] when the store cannot be reached
    /// and [`TaskStoreError::Malformed`] when the response does not decode.
    async fn fetch_all_tasks(&self) -> TaskStoreResult<Vec<TaskRecord>>;

    /// Writes a new raw status for a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist and
    /// [`TaskStoreError::Transport`] when the write does not reach the store.
    async fn update_task_status(&self, task_id: &TaskId, new_status: &str) -> TaskStoreResult<()>;

    /// Returns a single task for detail views.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist.
    async fn fetch_task_by_id(&self, task_id: &TaskId) -> TaskStoreResult<TaskRecord>;
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// The remote call failed in transit or returned an error status.
    #[error("transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),

    /// The response did not decode into task records.
    #[error("malformed response: {0}")]
    Malformed(#[from] MalformedDataError),

    /// The task does not exist in the store.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The call did not settle within the allotted time.
    #[error("timed out after {0:?}")]
    TimedOut(Duration),
}

impl TaskStoreError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }

    /// Wraps a transport failure described only by a message.
    pub fn transport_message(message: impl Into<String>) -> Self {
        Self::transport(std::io::Error::other(message.into()))
    }
}
