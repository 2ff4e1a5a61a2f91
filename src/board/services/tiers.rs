//! Ordered read tiers with per-tier timeouts.
//!
//! A read walks the tiers in order and stops at the first one that yields a
//! usable result. Failed tiers are recorded as [`TierAttempt`]s and logged;
//! they never surface to callers as errors.

use crate::board::{
    adapters::fallback::FallbackDataset,
    domain::{BoardScope, Provenance, TaskRecord},
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
};
use crate::config::{EmptyResultPolicy, SyncConfig};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

/// A named read strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadTier {
    /// Remote read filtered by project or assignee.
    Scoped(BoardScope),
    /// Unfiltered remote read.
    Broad,
    /// The local fallback dataset.
    Fallback,
}

impl ReadTier {
    /// Returns the tiers tried for a scope, in order.
    ///
    /// The scoped tier is omitted for [`BoardScope::All`] since it would
    /// repeat the broad read.
    #[must_use]
    pub fn chain_for(scope: &BoardScope) -> Vec<Self> {
        match scope {
            BoardScope::All => vec![Self::Broad, Self::Fallback],
            filtered => vec![Self::Scoped(filtered.clone()), Self::Broad, Self::Fallback],
        }
    }

    /// Returns the tier name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Scoped(_) => "scoped",
            Self::Broad => "broad",
            Self::Fallback => "fallback",
        }
    }

    /// Returns the provenance of data produced by this tier.
    #[must_use]
    pub const fn provenance(&self) -> Provenance {
        match self {
            Self::Scoped(_) => Provenance::LiveScoped,
            Self::Broad => Provenance::LiveBroad,
            Self::Fallback => Provenance::Fallback,
        }
    }
}

impl fmt::Display for ReadTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a tier did not produce the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TierFailure {
    /// The store could not be reached or answered with an error status.
    Transport(String),
    /// The response did not decode into task records.
    Malformed(String),
    /// The tier did not settle in time.
    TimedOut(Duration),
    /// The tier returned no records and the policy asks to keep looking.
    Empty,
}

impl TierFailure {
    /// Returns the reason label used in logs.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Malformed(_) => "malformed",
            Self::TimedOut(_) => "timed-out",
            Self::Empty => "empty",
        }
    }
}

impl From<TaskStoreError> for TierFailure {
    fn from(err: TaskStoreError) -> Self {
        match err {
            TaskStoreError::Malformed(source) => Self::Malformed(source.to_string()),
            TaskStoreError::TimedOut(after) => Self::TimedOut(after),
            other @ (TaskStoreError::Transport(_) | TaskStoreError::NotFound(_)) => {
                Self::Transport(other.to_string())
            }
        }
    }
}

impl fmt::Display for TierFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(detail) | Self::Malformed(detail) => {
                write!(f, "{}: {detail}", self.reason())
            }
            Self::TimedOut(after) => write!(f, "timed-out after {after:?}"),
            Self::Empty => f.write_str("empty"),
        }
    }
}

/// A tier that was tried and skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierAttempt {
    tier: ReadTier,
    failure: TierFailure,
}

impl TierAttempt {
    /// Returns the tier that failed.
    #[must_use]
    pub const fn tier(&self) -> &ReadTier {
        &self.tier
    }

    /// Returns why it failed.
    #[must_use]
    pub const fn failure(&self) -> &TierFailure {
        &self.failure
    }
}

/// Outcome of walking the tier chain.
#[derive(Debug, Clone, PartialEq)]
pub struct TieredRead {
    records: Vec<TaskRecord>,
    provenance: Provenance,
    attempts: Vec<TierAttempt>,
}

impl TieredRead {
    /// Returns the records of the winning tier.
    #[must_use]
    pub fn records(&self) -> &[TaskRecord] {
        &self.records
    }

    /// Consumes the read, returning its records.
    #[must_use]
    pub fn into_records(self) -> Vec<TaskRecord> {
        self.records
    }

    /// Returns which tier produced the records.
    #[must_use]
    pub const fn provenance(&self) -> Provenance {
        self.provenance
    }

    /// Returns the tiers skipped before the winning one.
    #[must_use]
    pub fn attempts(&self) -> &[TierAttempt] {
        &self.attempts
    }

    /// Splits the read into its parts.
    #[must_use]
    pub fn into_parts(self) -> (Vec<TaskRecord>, Provenance, Vec<TierAttempt>) {
        (self.records, self.provenance, self.attempts)
    }
}

/// Walks the read tier chain against a task store.
pub struct TieredReader<S>
where
    S: TaskStore,
{
    store: Arc<S>,
    fallback: Arc<FallbackDataset>,
    config: SyncConfig,
}

impl<S> Clone for TieredReader<S>
where
    S: TaskStore,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            fallback: Arc::clone(&self.fallback),
            config: self.config,
        }
    }
}

impl<S> TieredReader<S>
where
    S: TaskStore,
{
    /// Creates a reader.
    #[must_use]
    pub const fn new(store: Arc<S>, fallback: Arc<FallbackDataset>, config: SyncConfig) -> Self {
        Self {
            store,
            fallback,
            config,
        }
    }

    /// Returns the store the live tiers read from.
    #[must_use]
    pub const fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Reads records for a scope, degrading tier by tier.
    ///
    /// Always returns a result; when every live tier fails the fallback
    /// dataset is served, even if it is empty.
    pub async fn read(&self, scope: &BoardScope) -> TieredRead {
        let mut attempts = Vec::new();
        for tier in ReadTier::chain_for(scope) {
            if tier == ReadTier::Fallback {
                break;
            }
            match self.read_live(&tier).await {
                Ok(records) => {
                    debug!(tier = tier.name(), count = records.len(), "read tier succeeded");
                    return TieredRead {
                        records,
                        provenance: tier.provenance(),
                        attempts,
                    };
                }
                Err(failure) => {
                    warn!(
                        tier = tier.name(),
                        reason = failure.reason(),
                        detail = %failure,
                        %scope,
                        "read tier failed, trying next tier"
                    );
                    attempts.push(TierAttempt { tier, failure });
                }
            }
        }
        self.read_fallback(attempts)
    }

    async fn read_live(&self, tier: &ReadTier) -> Result<Vec<TaskRecord>, TierFailure> {
        let limit = self.config.tier_timeout();
        let records = tokio::time::timeout(limit, self.fetch(tier))
            .await
            .map_err(|_| TierFailure::TimedOut(limit))??;
        if records.is_empty() && self.config.empty_result_policy == EmptyResultPolicy::FallThrough
        {
            return Err(TierFailure::Empty);
        }
        Ok(records)
    }

    async fn fetch(&self, tier: &ReadTier) -> TaskStoreResult<Vec<TaskRecord>> {
        match tier {
            ReadTier::Scoped(BoardScope::Project(project)) => {
                self.store.fetch_tasks_by_project(project).await
            }
            ReadTier::Scoped(BoardScope::Assignee(owner)) => {
                self.store.fetch_tasks_by_assignee(owner).await
            }
            ReadTier::Scoped(BoardScope::All) | ReadTier::Broad | ReadTier::Fallback => {
                self.store.fetch_all_tasks().await
            }
        }
    }

    fn read_fallback(&self, attempts: Vec<TierAttempt>) -> TieredRead {
        if self.fallback.is_empty() {
            error!(
                failed_tiers = attempts.len(),
                "fallback dataset is empty, serving an empty board"
            );
        } else {
            warn!(
                failed_tiers = attempts.len(),
                count = self.fallback.records().len(),
                "serving fallback dataset"
            );
        }
        TieredRead {
            records: self.fallback.records().to_vec(),
            provenance: Provenance::Fallback,
            attempts,
        }
    }
}
