//! The three-column board rebuilt on every reconciliation cycle.

use super::{ClassificationResult, ColumnState, StatusClassifier, TaskId, TaskRecord};
use serde::Serialize;

/// Number of records in each column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ColumnCounts {
    /// Records in the todo column.
    pub todo: usize,
    /// Records in the doing column.
    pub doing: usize,
    /// Records in the done column.
    pub done: usize,
}

impl ColumnCounts {
    /// Returns the count for one column.
    #[must_use]
    pub const fn get(&self, column: ColumnState) -> usize {
        match column {
            ColumnState::Todo => self.todo,
            ColumnState::Doing => self.doing,
            ColumnState::Done => self.done,
        }
    }

    /// Returns the number of records across all columns.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.todo + self.doing + self.done
    }
}

/// Per-column membership of task records for one load cycle.
///
/// A board is only ever built whole from a record list. There is no way to
/// move a record between columns in place; a status change becomes visible
/// when the next remote read produces a new board.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Board {
    todo: Vec<TaskRecord>,
    doing: Vec<TaskRecord>,
    done: Vec<TaskRecord>,
    classifications: Vec<ClassificationResult>,
}

impl Board {
    /// Classifies every record and places it in its column, preserving input
    /// order within each column.
    #[must_use]
    pub fn build(records: Vec<TaskRecord>, classifier: &StatusClassifier) -> Self {
        let mut board = Self {
            classifications: Vec::with_capacity(records.len()),
            ..Self::default()
        };
        for record in records {
            let result = classifier.classify_record(&record);
            board.column_mut(result.column).push(record);
            board.classifications.push(result);
        }
        board
    }

    /// Returns the records in a column in input order.
    #[must_use]
    pub fn column(&self, column: ColumnState) -> &[TaskRecord] {
        match column {
            ColumnState::Todo => &self.todo,
            ColumnState::Doing => &self.doing,
            ColumnState::Done => &self.done,
        }
    }

    const fn column_mut(&mut self, column: ColumnState) -> &mut Vec<TaskRecord> {
        match column {
            ColumnState::Todo => &mut self.todo,
            ColumnState::Doing => &mut self.doing,
            ColumnState::Done => &mut self.done,
        }
    }

    /// Returns per-column counts.
    #[must_use]
    pub const fn counts(&self) -> ColumnCounts {
        ColumnCounts {
            todo: self.todo.len(),
            doing: self.doing.len(),
            done: self.done.len(),
        }
    }

    /// Returns the number of records on the board.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.counts().total()
    }

    /// Returns `true` when the board holds no records.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the column holding a record, if it is on the board.
    #[must_use]
    pub fn locate(&self, task_id: &TaskId) -> Option<ColumnState> {
        ColumnState::ALL.into_iter().find(|column| {
            self.column(*column)
                .iter()
                .any(|record| record.id() == task_id)
        })
    }

    /// Returns a record by identifier.
    #[must_use]
    pub fn record(&self, task_id: &TaskId) -> Option<&TaskRecord> {
        ColumnState::ALL
            .into_iter()
            .flat_map(|column| self.column(column))
            .find(|record| record.id() == task_id)
    }

    /// Returns the classification audit trail in input order.
    #[must_use]
    pub fn classifications(&self) -> &[ClassificationResult] {
        &self.classifications
    }

    /// Returns audit entries for statuses that hit the todo fallback.
    pub fn unrecognized(&self) -> impl Iterator<Item = &ClassificationResult> {
        self.classifications
            .iter()
            .filter(|result| result.reason.is_unrecognized())
    }
}
