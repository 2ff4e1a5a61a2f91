//! Application services for board reads, writes and notifications.

mod pending;
mod sync;
mod tiers;

pub use pending::{PendingCount, PendingWorkCounter};
pub use sync::{
    BoardSnapshot, DropRequest, LoadReport, PublishStatus, SyncEngine, TransitionReport,
    TransitionRequest, WriteOutcome,
};
pub use tiers::{ReadTier, TierAttempt, TierFailure, TieredRead, TieredReader};
