//! Task records as owned by the remote task store.

use super::{ActorId, ProjectId, TaskId};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

/// A task as reported by the remote system of record.
///
/// The engine never mutates a record; status changes are requested through
/// the sync engine and observed on the next reconciliation read. Fields the
/// engine does not model are kept verbatim in [`TaskRecord::extra`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskRecord {
    id: TaskId,
    title: String,
    status: Option<String>,
    priority: Option<String>,
    assignee_id: Option<ActorId>,
    project_id: Option<ProjectId>,
    estimated_hours: Option<f64>,
    start_date: Option<NaiveDate>,
    due_date: Option<NaiveDate>,
    description: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl TaskRecord {
    /// Creates a record with the required fields.
    #[must_use]
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            status: None,
            priority: None,
            assignee_id: None,
            project_id: None,
            estimated_hours: None,
            start_date: None,
            due_date: None,
            description: None,
            extra: Map::new(),
        }
    }

    /// Sets the raw status text.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Sets the priority label.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Sets the assignee.
    #[must_use]
    pub fn with_assignee(mut self, assignee: ActorId) -> Self {
        self.assignee_id = Some(assignee);
        self
    }

    /// Sets the owning project.
    #[must_use]
    pub fn with_project(mut self, project: ProjectId) -> Self {
        self.project_id = Some(project);
        self
    }

    /// Sets the estimated effort in hours.
    #[must_use]
    pub const fn with_estimated_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = Some(hours);
        self
    }

    /// Sets the planned start date.
    #[must_use]
    pub const fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }

    /// Sets the free-text description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attaches a pass-through field the engine does not interpret.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Returns the record identifier.
    #[must_use]
    pub const fn id(&self) -> &TaskId {
        &self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the raw status text exactly as the remote store reported it.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Returns the priority label.
    #[must_use]
    pub fn priority(&self) -> Option<&str> {
        self.priority.as_deref()
    }

    /// Returns the assignee.
    #[must_use]
    pub const fn assignee_id(&self) -> Option<&ActorId> {
        self.assignee_id.as_ref()
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> Option<&ProjectId> {
        self.project_id.as_ref()
    }

    /// Returns the estimated effort in hours.
    #[must_use]
    pub const fn estimated_hours(&self) -> Option<f64> {
        self.estimated_hours
    }

    /// Returns the planned start date.
    #[must_use]
    pub const fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    /// Returns the due date.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns fields carried through from the payload untouched.
    #[must_use]
    pub const fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Returns a copy of this record with a different raw status.
    ///
    /// Store adapters use this to reflect an accepted status write.
    #[must_use]
    pub fn with_replaced_status(&self, status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..self.clone()
        }
    }
}
