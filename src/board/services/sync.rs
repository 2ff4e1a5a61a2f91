//! Board loading, status writes and reconciliation.

use crate::board::{
    adapters::fallback::FallbackDataset,
    domain::{
        Board, BoardScope, ColumnRegions, ColumnState, NoOpReason, Point, Provenance,
        SessionContext, StatusClassifier, TaskId, TaskRecord, resolve_transition,
    },
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
    services::tiers::{TierAttempt, TieredReader},
};
use crate::config::{SequencePolicy, StatusVocabulary, SyncConfig};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// A classified board together with where and when it was read.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardSnapshot {
    board: Board,
    scope: BoardScope,
    provenance: Provenance,
    sequence: u64,
    loaded_at: DateTime<Utc>,
    attempts: Vec<TierAttempt>,
}

impl BoardSnapshot {
    /// Returns the classified board.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the scope the board was loaded for.
    #[must_use]
    pub const fn scope(&self) -> &BoardScope {
        &self.scope
    }

    /// Returns which tier produced the records.
    #[must_use]
    pub const fn provenance(&self) -> Provenance {
        self.provenance
    }

    /// Returns the sequence token taken when the load was issued.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns when the load completed.
    #[must_use]
    pub const fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Returns the tiers that failed before the winning one.
    #[must_use]
    pub fn attempts(&self) -> &[TierAttempt] {
        &self.attempts
    }
}

/// Whether a load's snapshot became the published board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStatus {
    /// The snapshot is the published board.
    Current,
    /// A newer load had already published; this snapshot was discarded.
    Superseded,
}

/// Result of a board load.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    snapshot: Arc<BoardSnapshot>,
    publish: PublishStatus,
}

impl LoadReport {
    /// Returns the snapshot produced by the load.
    #[must_use]
    pub const fn snapshot(&self) -> &Arc<BoardSnapshot> {
        &self.snapshot
    }

    /// Returns whether the snapshot was published.
    #[must_use]
    pub const fn publish(&self) -> PublishStatus {
        self.publish
    }

    /// Returns `true` when the snapshot is the published board.
    #[must_use]
    pub const fn is_current(&self) -> bool {
        matches!(self.publish, PublishStatus::Current)
    }
}

/// Request to move a task to a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRequest {
    task_id: TaskId,
    target: ColumnState,
    current: Option<ColumnState>,
    scope: Option<BoardScope>,
}

impl TransitionRequest {
    /// Creates a request. The current column is looked up on the published
    /// board and the reload uses the session's default scope unless set.
    #[must_use]
    pub const fn new(task_id: TaskId, target: ColumnState) -> Self {
        Self {
            task_id,
            target,
            current: None,
            scope: None,
        }
    }

    /// Sets the column the task occupies now.
    #[must_use]
    pub const fn with_current(mut self, current: ColumnState) -> Self {
        self.current = Some(current);
        self
    }

    /// Sets the scope of the reconciliation reload, overriding the published
    /// board's scope.
    #[must_use]
    pub fn with_scope(mut self, scope: BoardScope) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Returns the task to move.
    #[must_use]
    pub const fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    /// Returns the destination column.
    #[must_use]
    pub const fn target(&self) -> ColumnState {
        self.target
    }
}

/// A drop gesture: a task released at a point over the column regions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropRequest {
    task_id: TaskId,
    drop_point: Point,
    regions: ColumnRegions,
    current: Option<ColumnState>,
    scope: Option<BoardScope>,
}

impl DropRequest {
    /// Creates a drop request.
    #[must_use]
    pub const fn new(task_id: TaskId, drop_point: Point, regions: ColumnRegions) -> Self {
        Self {
            task_id,
            drop_point,
            regions,
            current: None,
            scope: None,
        }
    }

    /// Sets the column the task was dragged from.
    #[must_use]
    pub const fn with_current(mut self, current: ColumnState) -> Self {
        self.current = Some(current);
        self
    }

    /// Sets the scope of the reconciliation reload, overriding the published
    /// board's scope.
    #[must_use]
    pub fn with_scope(mut self, scope: BoardScope) -> Self {
        self.scope = Some(scope);
        self
    }
}

/// What happened to the status write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// No write was issued.
    Skipped(NoOpReason),
    /// The store acknowledged the write.
    Persisted,
    /// The write failed; `notice` is the single message for the user.
    Failed {
        /// User-facing failure notice.
        notice: String,
    },
}

/// Result of a transition request.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionReport {
    task_id: TaskId,
    write: WriteOutcome,
    reconciliation: Option<LoadReport>,
}

impl TransitionReport {
    /// Returns the task the request was about.
    #[must_use]
    pub const fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    /// Returns the write outcome.
    #[must_use]
    pub const fn write(&self) -> &WriteOutcome {
        &self.write
    }

    /// Returns the reload that followed the write, absent when the write was
    /// skipped.
    #[must_use]
    pub const fn reconciliation(&self) -> Option<&LoadReport> {
        self.reconciliation.as_ref()
    }
}

/// Loads boards through the tier chain and persists column moves.
///
/// Published boards are shared through a watch channel. Every write is
/// followed by a reload so the displayed board reflects the store, never
/// the optimistic local move.
pub struct SyncEngine<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    reader: TieredReader<S>,
    clock: Arc<C>,
    classifier: Arc<StatusClassifier>,
    config: SyncConfig,
    vocabulary: Arc<StatusVocabulary>,
    sequence: Arc<AtomicU64>,
    published: Arc<watch::Sender<Option<Arc<BoardSnapshot>>>>,
}

impl<S, C> Clone for SyncEngine<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            reader: self.reader.clone(),
            clock: Arc::clone(&self.clock),
            classifier: Arc::clone(&self.classifier),
            config: self.config,
            vocabulary: Arc::clone(&self.vocabulary),
            sequence: Arc::clone(&self.sequence),
            published: Arc::clone(&self.published),
        }
    }
}

impl<S, C> SyncEngine<S, C>
where
    S: TaskStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Creates an engine with the default classifier and vocabulary.
    #[must_use]
    pub fn new(
        store: Arc<S>,
        clock: Arc<C>,
        fallback: Arc<FallbackDataset>,
        config: SyncConfig,
    ) -> Self {
        let (published, _) = watch::channel(None);
        Self {
            reader: TieredReader::new(store, fallback, config),
            clock,
            classifier: Arc::new(StatusClassifier::default()),
            config,
            vocabulary: Arc::new(StatusVocabulary::default()),
            sequence: Arc::new(AtomicU64::new(0)),
            published: Arc::new(published),
        }
    }

    /// Replaces the status classifier.
    #[must_use]
    pub fn with_classifier(mut self, classifier: StatusClassifier) -> Self {
        self.classifier = Arc::new(classifier);
        self
    }

    /// Replaces the statuses written per column.
    #[must_use]
    pub fn with_vocabulary(mut self, vocabulary: StatusVocabulary) -> Self {
        self.vocabulary = Arc::new(vocabulary);
        self
    }

    /// Returns the classifier used to build boards.
    #[must_use]
    pub fn classifier(&self) -> &StatusClassifier {
        &self.classifier
    }

    /// Subscribes to published boards.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<BoardSnapshot>>> {
        self.published.subscribe()
    }

    /// Returns the published board, if any load has completed.
    #[must_use]
    pub fn current_board(&self) -> Option<Arc<BoardSnapshot>> {
        self.published.borrow().clone()
    }

    /// Loads and classifies a board, then publishes it unless a newer load
    /// already has.
    ///
    /// Never fails: when the remote store is unusable the board is built
    /// from the fallback dataset.
    pub async fn load_board(&self, session: &SessionContext, scope: &BoardScope) -> LoadReport {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst).saturating_add(1);
        debug!(sequence, actor = %session.actor(), %scope, "loading board");

        let (records, provenance, attempts) = self.reader.read(scope).await.into_parts();
        let snapshot = Arc::new(BoardSnapshot {
            board: Board::build(records, &self.classifier),
            scope: scope.clone(),
            provenance,
            sequence,
            loaded_at: self.clock.utc(),
            attempts,
        });
        let publish = self.publish(&snapshot);
        info!(
            sequence,
            %provenance,
            tasks = snapshot.board.len(),
            published = matches!(publish, PublishStatus::Current),
            "board loaded"
        );
        LoadReport { snapshot, publish }
    }

    fn publish(&self, snapshot: &Arc<BoardSnapshot>) -> PublishStatus {
        let policy = self.config.sequence_policy;
        let accepted = self.published.send_if_modified(|current| {
            let stale = policy == SequencePolicy::DiscardStale
                && current
                    .as_ref()
                    .is_some_and(|published| published.sequence > snapshot.sequence);
            if stale {
                return false;
            }
            *current = Some(Arc::clone(snapshot));
            true
        });
        if accepted {
            PublishStatus::Current
        } else {
            debug!(sequence = snapshot.sequence, "discarding superseded board");
            PublishStatus::Superseded
        }
    }

    /// Persists a column move, then reloads the board.
    ///
    /// A move to the column the task already occupies issues no write and no
    /// reload. Otherwise exactly one write is attempted and, whatever its
    /// outcome, the board is reloaded from the store. The reload uses the
    /// request's scope, else the published board's scope, else the
    /// session's default scope.
    pub async fn request_transition(
        &self,
        session: &SessionContext,
        request: TransitionRequest,
    ) -> TransitionReport {
        let TransitionRequest {
            task_id,
            target,
            current,
            scope,
        } = request;
        let known = current.or_else(|| self.locate_published(&task_id));
        if known == Some(target) {
            debug!(%task_id, column = %target, "task already in target column, skipping write");
            return TransitionReport {
                task_id,
                write: WriteOutcome::Skipped(NoOpReason::SameColumn),
                reconciliation: None,
            };
        }

        let write = self.write_status(&task_id, target).await;
        let reload_scope = scope
            .or_else(|| self.published_scope())
            .unwrap_or_else(|| session.default_scope());
        let reconciliation = self.load_board(session, &reload_scope).await;
        TransitionReport {
            task_id,
            write,
            reconciliation: Some(reconciliation),
        }
    }

    fn published_scope(&self) -> Option<BoardScope> {
        self.published
            .borrow()
            .as_ref()
            .map(|snapshot| snapshot.scope.clone())
    }

    fn locate_published(&self, task_id: &TaskId) -> Option<ColumnState> {
        self.published
            .borrow()
            .as_ref()
            .and_then(|snapshot| snapshot.board.locate(task_id))
    }

    async fn write_status(&self, task_id: &TaskId, target: ColumnState) -> WriteOutcome {
        let status = self.vocabulary.status_for(target);
        let limit = self.config.write_timeout();
        let write = self.reader.store().update_task_status(task_id, status);
        let result = tokio::time::timeout(limit, write)
            .await
            .unwrap_or(Err(TaskStoreError::TimedOut(limit)));
        match result {
            Ok(()) => {
                info!(%task_id, column = %target, status, "task status persisted");
                WriteOutcome::Persisted
            }
            Err(err) => {
                warn!(%task_id, column = %target, error = %err, "task status write failed");
                WriteOutcome::Failed {
                    notice: format!("Could not move {task_id} to {}: {err}", target.label()),
                }
            }
        }
    }

    /// Resolves a drop gesture and, when it lands on another column,
    /// requests the transition.
    pub async fn handle_drop(
        &self,
        session: &SessionContext,
        request: DropRequest,
    ) -> TransitionReport {
        let DropRequest {
            task_id,
            drop_point,
            regions,
            current,
            scope,
        } = request;
        let known = current.or_else(|| self.locate_published(&task_id));
        let resolved = resolve_transition(drop_point, &regions, known.unwrap_or(ColumnState::Todo));
        let Some(target) = resolved else {
            debug!(%task_id, ?drop_point, "drop outside every column");
            return TransitionReport {
                task_id,
                write: WriteOutcome::Skipped(NoOpReason::OutsideRegions),
                reconciliation: None,
            };
        };

        let mut transition = TransitionRequest::new(task_id, target);
        transition.current = known;
        transition.scope = scope;
        self.request_transition(session, transition).await
    }

    /// Returns a single task straight from the store.
    ///
    /// # Errors
    ///
    /// Returns the store error; detail reads do not fall back.
    pub async fn fetch_task(&self, task_id: &TaskId) -> TaskStoreResult<TaskRecord> {
        self.reader.store().fetch_task_by_id(task_id).await
    }

    /// Runs [`Self::load_board`] on the Tokio runtime.
    #[must_use]
    pub fn spawn_load(&self, session: SessionContext, scope: BoardScope) -> JoinHandle<LoadReport> {
        let engine = self.clone();
        tokio::spawn(async move { engine.load_board(&session, &scope).await })
    }

    /// Runs [`Self::request_transition`] on the Tokio runtime.
    #[must_use]
    pub fn spawn_transition(
        &self,
        session: SessionContext,
        request: TransitionRequest,
    ) -> JoinHandle<TransitionReport> {
        let engine = self.clone();
        tokio::spawn(async move { engine.request_transition(&session, request).await })
    }
}
