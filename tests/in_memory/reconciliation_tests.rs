//! End-to-end board reconciliation over the in-memory store.

use crate::in_memory::helpers::{engine, session, store, task_id};
use eyre::{Result, ensure, eyre};
use rstest::rstest;
use std::sync::Arc;
use taskboard::board::{
    adapters::{
        fallback::FallbackDataset,
        memory::{InMemoryTaskStore, InjectedFailure, StoreOperation},
    },
    domain::{ColumnRegions, ColumnState, Point, Rect, SessionContext, StatusClassifier},
    services::{DropRequest, PendingWorkCounter, TieredReader, WriteOutcome},
};
use taskboard::config::SyncConfig;

fn regions() -> ColumnRegions {
    ColumnRegions::new(
        Rect::new(0, 0, 300, 800),
        Rect::new(320, 0, 300, 800),
        Rect::new(640, 0, 300, 800),
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn drag_to_done_updates_board_and_pending_count(
    store: InMemoryTaskStore,
    session: SessionContext,
) -> Result<()> {
    let engine = engine(Arc::new(store.clone()), SyncConfig::fast());
    let pending = PendingWorkCounter::new(
        TieredReader::new(
            Arc::new(store.clone()),
            Arc::new(FallbackDataset::builtin()),
            SyncConfig::fast(),
        ),
        Arc::new(StatusClassifier::default()),
    );
    engine.load_board(&session, &session.default_scope()).await;
    ensure!(pending.pending_for(&session).await.count() == 1);

    let report = engine
        .handle_drop(
            &session,
            DropRequest::new(task_id("T-1"), Point::new(700, 40), regions()),
        )
        .await;

    ensure!(report.write() == &WriteOutcome::Persisted);
    let reload = report
        .reconciliation()
        .ok_or_else(|| eyre!("write must be reconciled"))?;
    ensure!(reload.is_current());
    let counts = reload.snapshot().board().counts();
    ensure!((counts.todo, counts.doing, counts.done) == (0, 1, 2));
    ensure!(pending.pending_for(&session).await.count() == 0);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_write_leaves_remote_state_on_screen(
    store: InMemoryTaskStore,
    session: SessionContext,
) -> Result<()> {
    let engine = engine(Arc::new(store.clone()), SyncConfig::fast());
    engine.load_board(&session, &session.default_scope()).await;
    store.fail(
        StoreOperation::UpdateStatus,
        InjectedFailure::Transport("HTTP 503".to_owned()),
    )?;

    let report = engine
        .handle_drop(
            &session,
            DropRequest::new(task_id("T-2"), Point::new(10, 10), regions()),
        )
        .await;

    ensure!(
        matches!(report.write(), WriteOutcome::Failed { notice } if notice.contains("HTTP 503")),
        "unexpected outcome {:?}",
        report.write()
    );
    let published = engine
        .current_board()
        .ok_or_else(|| eyre!("no board published"))?;
    ensure!(published.board().locate(&task_id("T-2")) == Some(ColumnState::Doing));
    ensure!(store.calls(StoreOperation::UpdateStatus) == 1);
    ensure!(store.calls(StoreOperation::FetchByProject) == 2);
    Ok(())
}
