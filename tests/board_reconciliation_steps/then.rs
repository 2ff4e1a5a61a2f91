//! Then steps for board reconciliation BDD scenarios.

use super::world::BoardWorld;
use rstest_bdd_macros::then;
use taskboard::board::{
    adapters::memory::StoreOperation,
    domain::{ColumnState, NoOpReason, TaskId},
    services::{TransitionReport, WriteOutcome},
};

fn last_transition(world: &BoardWorld) -> Result<&TransitionReport, eyre::Report> {
    world
        .last_transition
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing transition report"))
}

#[then(r#"the board provenance is "{provenance}""#)]
fn board_provenance(world: &BoardWorld, provenance: String) -> Result<(), eyre::Report> {
    let report = world
        .last_load
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing load report"))?;
    let actual = report.snapshot().provenance();
    if actual.as_str() != provenance {
        return Err(eyre::eyre!("expected provenance {provenance}, found {actual}"));
    }
    Ok(())
}

#[then("the board shows {todo:usize} todo, {doing:usize} doing and {done:usize} done tasks")]
fn board_counts(
    world: &BoardWorld,
    todo: usize,
    doing: usize,
    done: usize,
) -> Result<(), eyre::Report> {
    let board = world
        .engine
        .current_board()
        .ok_or_else(|| eyre::eyre!("no board published"))?;
    let counts = board.board().counts();
    if (counts.todo, counts.doing, counts.done) != (todo, doing, done) {
        return Err(eyre::eyre!("unexpected column counts {counts:?}"));
    }
    Ok(())
}

#[then(r#""{id}" is shown in "{column}""#)]
fn task_shown_in(world: &BoardWorld, id: String, column: String) -> Result<(), eyre::Report> {
    let expected = ColumnState::try_from(column.as_str())
        .map_err(|err| eyre::eyre!("invalid column in scenario: {err}"))?;
    let board = world
        .engine
        .current_board()
        .ok_or_else(|| eyre::eyre!("no board published"))?;
    let actual = board.board().locate(&TaskId::new(id.as_str())?);
    if actual != Some(expected) {
        return Err(eyre::eyre!("expected {id} in {expected}, found {actual:?}"));
    }
    Ok(())
}

#[then("the move is skipped")]
fn move_skipped(world: &BoardWorld) -> Result<(), eyre::Report> {
    let report = last_transition(world)?;
    if report.write() != &WriteOutcome::Skipped(NoOpReason::SameColumn) {
        return Err(eyre::eyre!("expected a skipped move, got {:?}", report.write()));
    }
    if report.reconciliation().is_some() {
        return Err(eyre::eyre!("a skipped move must not reload"));
    }
    Ok(())
}

#[then("the move is persisted")]
fn move_persisted(world: &BoardWorld) -> Result<(), eyre::Report> {
    let report = last_transition(world)?;
    if report.write() != &WriteOutcome::Persisted {
        return Err(eyre::eyre!("expected a persisted move, got {:?}", report.write()));
    }
    Ok(())
}

#[then(r#"the move fails with a notice mentioning "{text}""#)]
fn move_failed(world: &BoardWorld, text: String) -> Result<(), eyre::Report> {
    let report = last_transition(world)?;
    match report.write() {
        WriteOutcome::Failed { notice } if notice.contains(&text) => Ok(()),
        other => Err(eyre::eyre!("expected a failure mentioning {text}, got {other:?}")),
    }
}

#[then("the board was reloaded")]
fn board_reloaded(world: &BoardWorld) -> Result<(), eyre::Report> {
    let report = last_transition(world)?;
    let reload = report
        .reconciliation()
        .ok_or_else(|| eyre::eyre!("expected a reload after the write"))?;
    let initial = world
        .last_load
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing initial load report"))?;
    if reload.snapshot().sequence() <= initial.snapshot().sequence() {
        return Err(eyre::eyre!("reload did not take a newer sequence token"));
    }
    Ok(())
}

#[then("the task store received {count:usize} status writes")]
fn status_writes(world: &BoardWorld, count: usize) -> Result<(), eyre::Report> {
    let actual = world.store.calls(StoreOperation::UpdateStatus);
    if actual != count {
        return Err(eyre::eyre!("expected {count} status writes, found {actual}"));
    }
    Ok(())
}

#[then("{count:usize} tasks are pending")]
fn tasks_pending(world: &BoardWorld, count: usize) -> Result<(), eyre::Report> {
    let pending = world
        .last_pending
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing pending count"))?;
    if pending.count() != count {
        return Err(eyre::eyre!(
            "expected {count} pending tasks, found {}",
            pending.count()
        ));
    }
    Ok(())
}
