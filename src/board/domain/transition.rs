//! Drop-target resolution for drag-and-drop column moves.
//!
//! Coordinates are integer pixels in whatever space the presentation layer
//! uses; only containment is computed here.

use super::ColumnState;
use serde::{Deserialize, Serialize};

/// A point in presentation coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl Point {
    /// Creates a point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Rect {
    /// Creates a rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns `true` when the rectangle encloses no area.
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns `true` when the point lies inside the half-open rectangle.
    ///
    /// Degenerate rectangles contain no points.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        let (px, py) = (i64::from(point.x), i64::from(point.y));
        let (left, top) = (i64::from(self.x), i64::from(self.y));
        let right = left + i64::from(self.width);
        let bottom = top + i64::from(self.height);
        (left..right).contains(&px) && (top..bottom).contains(&py)
    }
}

/// On-screen regions of the three board columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRegions {
    /// Region of the todo column.
    pub todo: Rect,
    /// Region of the doing column.
    pub doing: Rect,
    /// Region of the done column.
    pub done: Rect,
}

impl ColumnRegions {
    /// Creates the column region set.
    #[must_use]
    pub const fn new(todo: Rect, doing: Rect, done: Rect) -> Self {
        Self { todo, doing, done }
    }

    /// Returns the region for a column.
    #[must_use]
    pub const fn region(&self, column: ColumnState) -> Rect {
        match column {
            ColumnState::Todo => self.todo,
            ColumnState::Doing => self.doing,
            ColumnState::Done => self.done,
        }
    }
}

/// Resolves the column under a drop point.
///
/// Regions are tested in board order (todo, doing, done) and the first that
/// contains the point wins. Returns `None` when the point is outside every
/// region. The current column does not affect the result; callers must
/// treat a result equal to it as a no-op, which [`plan_transition`] does.
#[must_use]
pub fn resolve_transition(
    drop_point: Point,
    regions: &ColumnRegions,
    _current: ColumnState,
) -> Option<ColumnState> {
    ColumnState::ALL
        .into_iter()
        .find(|column| regions.region(*column).contains(drop_point))
}

/// Why a drop produced no write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOpReason {
    /// The drop point lies outside every column region.
    OutsideRegions,
    /// The drop landed in the column the task already occupies.
    SameColumn,
}

/// What a drop gesture asks the sync engine to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPlan {
    /// Persist a move between two different columns.
    Move {
        /// Column the task occupies now.
        from: ColumnState,
        /// Column the task was dropped on.
        to: ColumnState,
    },
    /// Nothing to persist.
    NoOp(NoOpReason),
}

/// Resolves a drop into a move or an explicit no-op.
///
/// Any column may move to any other; no workflow order is enforced.
#[must_use]
pub fn plan_transition(
    drop_point: Point,
    regions: &ColumnRegions,
    current: ColumnState,
) -> TransitionPlan {
    match resolve_transition(drop_point, regions, current) {
        None => TransitionPlan::NoOp(NoOpReason::OutsideRegions),
        Some(target) if target == current => TransitionPlan::NoOp(NoOpReason::SameColumn),
        Some(target) => TransitionPlan::Move {
            from: current,
            to: target,
        },
    }
}
