//! Domain model for task classification and board reconciliation.
//!
//! Everything here is pure: status classification, board construction, drop
//! resolution and payload decoding perform no I/O.

mod board;
mod classifier;
mod column;
mod decode;
mod error;
mod ids;
mod notification;
mod provenance;
mod record;
mod session;
mod transition;

pub use board::{Board, ColumnCounts};
pub use classifier::{
    Classification, ClassificationReason, ClassificationResult, KeywordTable, StatusClassifier,
    normalize_status,
};
pub use column::ColumnState;
pub use decode::{decode_task, decode_task_list, decode_task_list_value};
pub use error::{MalformedDataError, ParseColumnStateError, TaskDomainError};
pub use ids::{ActorId, ProjectId, TaskId};
pub use notification::count_pending;
pub use provenance::Provenance;
pub use record::TaskRecord;
pub use session::{BoardScope, SessionContext};
pub use transition::{
    ColumnRegions, NoOpReason, Point, Rect, TransitionPlan, plan_transition, resolve_transition,
};
