//! Pending-work count shown when a user signs in.

use crate::board::{
    domain::{BoardScope, Provenance, SessionContext, StatusClassifier, count_pending},
    ports::TaskStore,
    services::tiers::TieredReader,
};
use std::sync::Arc;
use tracing::debug;

/// Number of todo tasks assigned to the session's actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingCount {
    count: usize,
    provenance: Provenance,
}

impl PendingCount {
    /// Returns the count.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Returns which tier the count was computed from.
    #[must_use]
    pub const fn provenance(&self) -> Provenance {
        self.provenance
    }
}

/// Counts pending work independently of board refreshes.
pub struct PendingWorkCounter<S>
where
    S: TaskStore,
{
    reader: TieredReader<S>,
    classifier: Arc<StatusClassifier>,
}

impl<S> PendingWorkCounter<S>
where
    S: TaskStore,
{
    /// Creates a counter.
    #[must_use]
    pub const fn new(reader: TieredReader<S>, classifier: Arc<StatusClassifier>) -> Self {
        Self { reader, classifier }
    }

    /// Counts todo tasks assigned to the session's actor.
    ///
    /// Reads the actor's tasks first, then everything, then the fallback
    /// dataset.
    pub async fn pending_for(&self, session: &SessionContext) -> PendingCount {
        let owner = session.actor();
        let read = self
            .reader
            .read(&BoardScope::Assignee(owner.clone()))
            .await;
        let count = count_pending(&self.classifier, owner, read.records());
        debug!(actor = %owner, count, provenance = %read.provenance(), "counted pending work");
        PendingCount {
            count,
            provenance: read.provenance(),
        }
    }
}
