//! Session context and read scopes.

use super::{ActorId, ProjectId};
use std::fmt;

/// The acting user and their current selection, passed into every engine
/// call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    actor: ActorId,
    selected_project: Option<ProjectId>,
}

impl SessionContext {
    /// Creates a session for an actor with no project selected.
    #[must_use]
    pub const fn new(actor: ActorId) -> Self {
        Self {
            actor,
            selected_project: None,
        }
    }

    /// Selects a project.
    #[must_use]
    pub fn with_project(mut self, project: ProjectId) -> Self {
        self.selected_project = Some(project);
        self
    }

    /// Returns the acting user.
    #[must_use]
    pub const fn actor(&self) -> &ActorId {
        &self.actor
    }

    /// Returns the selected project, if any.
    #[must_use]
    pub const fn selected_project(&self) -> Option<&ProjectId> {
        self.selected_project.as_ref()
    }

    /// Returns the board scope implied by the session: the selected project,
    /// otherwise the actor's own tasks.
    #[must_use]
    pub fn default_scope(&self) -> BoardScope {
        self.selected_project.clone().map_or_else(
            || BoardScope::Assignee(self.actor.clone()),
            BoardScope::Project,
        )
    }
}

/// Filter applied to the first, scoped read tier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BoardScope {
    /// Tasks belonging to a project.
    Project(ProjectId),
    /// Tasks assigned to an actor.
    Assignee(ActorId),
    /// Every task; the scoped tier is skipped.
    All,
}

impl fmt::Display for BoardScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Project(project) => write!(f, "project:{project}"),
            Self::Assignee(actor) => write!(f, "assignee:{actor}"),
            Self::All => f.write_str("all"),
        }
    }
}
