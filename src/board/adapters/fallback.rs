//! The fixed local dataset served when every remote tier fails.

use crate::board::domain::{
    ActorId, MalformedDataError, ProjectId, TaskDomainError, TaskId, TaskRecord, decode_task_list,
};
use camino::Utf8Path;
use cap_std::fs_utf8::Dir;
use thiserror::Error;

/// Errors raised while loading a fallback dataset file.
#[derive(Debug, Error)]
pub enum FallbackDatasetError {
    /// The file could not be read.
    #[error("failed to read fallback dataset {path}: {source}")]
    Read {
        /// Path relative to the capability directory.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file does not contain a task record list.
    #[error("fallback dataset {path} is malformed: {source}")]
    Malformed {
        /// Path relative to the capability directory.
        path: String,
        /// Decoder error.
        #[source]
        source: MalformedDataError,
    },
}

/// Records shown when the remote store cannot be read.
///
/// Boards built from this data carry [`Provenance::Fallback`] so the
/// presentation layer can flag them as stale.
///
/// [`Provenance::Fallback`]: crate::board::domain::Provenance::Fallback
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FallbackDataset {
    records: Vec<TaskRecord>,
}

impl FallbackDataset {
    /// Wraps a record list.
    #[must_use]
    pub const fn new(records: Vec<TaskRecord>) -> Self {
        Self { records }
    }

    /// Returns the built-in sample dataset.
    #[must_use]
    pub fn builtin() -> Self {
        let samples = [
            ("SAMPLE-1", "Draft project charter", "To Do", "High"),
            ("SAMPLE-2", "Collect stakeholder feedback", "Pending", "Medium"),
            ("SAMPLE-3", "Design database schema", "In Progress", "High"),
            ("SAMPLE-4", "Review API contract", "Review", "Medium"),
            ("SAMPLE-5", "Set up build pipeline", "Done", "Low"),
            ("SAMPLE-6", "Write onboarding guide", "Completed", "Low"),
        ];
        let records = samples
            .into_iter()
            .filter_map(|(id, title, status, priority)| {
                sample_record(id, title, status, priority).ok()
            })
            .collect();
        Self { records }
    }

    /// Loads a dataset from a JSON file inside a capability directory.
    ///
    /// The file uses the same shape as remote list responses.
    ///
    /// # Errors
    ///
    /// Returns [`FallbackDatasetError`] when the file cannot be read or does
    /// not decode.
    pub fn load(dir: &Dir, path: &Utf8Path) -> Result<Self, FallbackDatasetError> {
        let payload = dir
            .read_to_string(path)
            .map_err(|source| FallbackDatasetError::Read {
                path: path.to_string(),
                source,
            })?;
        let records =
            decode_task_list(&payload).map_err(|source| FallbackDatasetError::Malformed {
                path: path.to_string(),
                source,
            })?;
        Ok(Self { records })
    }

    /// Returns the records.
    #[must_use]
    pub fn records(&self) -> &[TaskRecord] {
        &self.records
    }

    /// Returns `true` when the dataset holds no records.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn sample_record(
    id: &str,
    title: &str,
    status: &str,
    priority: &str,
) -> Result<TaskRecord, TaskDomainError> {
    Ok(TaskRecord::new(TaskId::new(id)?, title)
        .with_status(status)
        .with_priority(priority)
        .with_assignee(ActorId::new("sample-user")?)
        .with_project(ProjectId::new("sample-project")?))
}
