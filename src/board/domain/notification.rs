//! Pending-work counting for login notifications.

use super::{ActorId, ColumnState, StatusClassifier, TaskRecord};

/// Counts records assigned to `owner` that classify as todo.
#[must_use]
pub fn count_pending(
    classifier: &StatusClassifier,
    owner: &ActorId,
    records: &[TaskRecord],
) -> usize {
    records
        .iter()
        .filter(|record| record.assignee_id() == Some(owner))
        .filter(|record| classifier.classify(record.status()) == ColumnState::Todo)
        .count()
}
