//! Ordering of concurrent board loads.
//!
//! Two loads are issued; the older one answers last with older data.

use crate::in_memory::helpers::{GateControl, GatedStore, engine, session, store, task, task_id};
use eyre::{Result, ensure, eyre};
use mockable::DefaultClock;
use rstest::rstest;
use std::sync::Arc;
use taskboard::board::{
    adapters::memory::InMemoryTaskStore,
    domain::{BoardScope, ColumnState, SessionContext},
    services::{LoadReport, PublishStatus, SyncEngine},
};
use taskboard::config::{SequencePolicy, SyncConfig};

/// Runs two overlapping loads where the first-issued one completes last.
///
/// `T-1` is moved to done between the two reads, so the first load carries
/// stale data.
async fn race(
    seeded: InMemoryTaskStore,
    session: SessionContext,
    policy: SequencePolicy,
) -> Result<(SyncEngine<GatedStore, DefaultClock>, LoadReport, LoadReport)> {
    let (gated, control) = GatedStore::new(seeded.clone(), 2);
    let GateControl {
        mut entered,
        mut releases,
    } = control;
    let config = SyncConfig::default().with_sequence_policy(policy);
    let engine = engine(Arc::new(gated), config);

    let older = engine.spawn_load(session.clone(), BoardScope::All);
    entered.recv().await.ok_or_else(|| eyre!("older load never read"))?;
    seeded.upsert(task("T-1", "Done"))?;
    let newer = engine.spawn_load(session, BoardScope::All);
    entered.recv().await.ok_or_else(|| eyre!("newer load never read"))?;

    let release_older = releases.pop_front().ok_or_else(|| eyre!("missing gate"))?;
    let release_newer = releases.pop_front().ok_or_else(|| eyre!("missing gate"))?;
    release_newer.send(()).map_err(|()| eyre!("newer load dropped"))?;
    let newer_report = newer.await?;
    release_older.send(()).map_err(|()| eyre!("older load dropped"))?;
    let older_report = older.await?;
    Ok((engine, older_report, newer_report))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_response_is_discarded(
    store: InMemoryTaskStore,
    session: SessionContext,
) -> Result<()> {
    let (engine, older, newer) = race(store, session, SequencePolicy::DiscardStale).await?;

    ensure!(older.snapshot().sequence() < newer.snapshot().sequence());
    ensure!(newer.publish() == PublishStatus::Current);
    ensure!(older.publish() == PublishStatus::Superseded);
    let published = engine
        .current_board()
        .ok_or_else(|| eyre!("no board published"))?;
    ensure!(published.sequence() == newer.snapshot().sequence());
    ensure!(published.board().locate(&task_id("T-1")) == Some(ColumnState::Done));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn last_response_wins_policy_shows_stale_board(
    store: InMemoryTaskStore,
    session: SessionContext,
) -> Result<()> {
    let (engine, older, _newer) = race(store, session, SequencePolicy::LastResponseWins).await?;

    ensure!(older.publish() == PublishStatus::Current);
    let published = engine
        .current_board()
        .ok_or_else(|| eyre!("no board published"))?;
    ensure!(published.board().locate(&task_id("T-1")) == Some(ColumnState::Todo));
    Ok(())
}
