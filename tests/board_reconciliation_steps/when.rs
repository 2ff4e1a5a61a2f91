//! When steps for board reconciliation BDD scenarios.

use super::world::{BoardWorld, run_async};
use rstest_bdd_macros::when;
use taskboard::board::{
    domain::{ColumnState, TaskId},
    services::TransitionRequest,
};

#[when("the board is loaded")]
fn load_board(world: &mut BoardWorld) -> Result<(), eyre::Report> {
    let session = world.session()?.clone();
    let report = run_async(world.engine.load_board(&session, &session.default_scope()));
    world.last_load = Some(report);
    Ok(())
}

#[when(r#""{id}" is moved to "{column}""#)]
fn move_task(world: &mut BoardWorld, id: String, column: String) -> Result<(), eyre::Report> {
    let session = world.session()?.clone();
    let target = ColumnState::try_from(column.as_str())
        .map_err(|err| eyre::eyre!("invalid column in scenario: {err}"))?;
    let request = TransitionRequest::new(TaskId::new(id)?, target);
    let report = run_async(world.engine.request_transition(&session, request));
    world.last_transition = Some(report);
    Ok(())
}

#[when("pending work is counted")]
fn count_pending(world: &mut BoardWorld) -> Result<(), eyre::Report> {
    let session = world.session()?.clone();
    let count = run_async(world.pending.pending_for(&session));
    world.last_pending = Some(count);
    Ok(())
}
