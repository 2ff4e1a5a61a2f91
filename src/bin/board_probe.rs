//! Loads one board through the configured HTTP store and logs the result.
//!
//! Usage:
//!
//! ```text
//! board_probe <config-path> [project-id]
//! ```
//!
//! `config-path` points at an [`EngineConfig`] JSON file. With a project id
//! the scoped tier reads that project; without one the probe reads every
//! task. Set `RUST_LOG=debug` to see each tier attempt.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use mockable::DefaultClock;
use std::env;
use std::sync::Arc;
use taskboard::board::{
    adapters::{fallback::FallbackDataset, http::HttpTaskStore},
    domain::{ActorId, BoardScope, ColumnState, ProjectId, SessionContext, TaskDomainError},
    ports::TaskStoreError,
    services::SyncEngine,
};
use taskboard::config::{ConfigError, EngineConfig};
use taskboard::telemetry::{TelemetryError, init_tracing};
use thiserror::Error;
use tokio::runtime::Builder;
use tracing::{info, warn};

/// Actor recorded on probe sessions.
const PROBE_ACTOR: &str = "board-probe";

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while probing.
#[derive(Debug, Error)]
enum ProbeError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error("failed to open config directory {path}: {source}")]
    ConfigDir {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Fallback(#[from] taskboard::board::adapters::fallback::FallbackDatasetError),
    #[error(transparent)]
    Store(#[from] TaskStoreError),
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("failed to initialise tokio runtime: {0}")]
    RuntimeInit(#[source] std::io::Error),
}

/// Parsed command line.
#[derive(Debug, PartialEq, Eq)]
struct ProbeArgs {
    config_path: Utf8PathBuf,
    project: Option<String>,
}

fn main() -> Result<(), BoxError> {
    init_tracing().map_err(ProbeError::from)?;
    let args = collect_args()?;
    run_probe(args.into_iter()).map_err(Into::into)
}

fn collect_args() -> Result<Vec<String>, ProbeError> {
    env::args_os()
        .map(|arg_os| {
            arg_os
                .into_string()
                .map_err(|_| ProbeError::InvalidArgs("argument is not valid UTF-8".into()))
        })
        .collect()
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<ProbeArgs, ProbeError> {
    let _program = args.next();
    let config_path = args
        .next()
        .map(Utf8PathBuf::from)
        .ok_or_else(|| ProbeError::InvalidArgs("missing config path argument".into()))?;
    let project = args.next();
    if let Some(extra) = args.next() {
        return Err(ProbeError::InvalidArgs(format!(
            "unexpected extra argument: {extra}"
        )));
    }
    Ok(ProbeArgs {
        config_path,
        project,
    })
}

/// Splits a path into its directory, opened with ambient authority, and the
/// file name inside it.
fn open_config_dir(path: &Utf8Path) -> Result<(Dir, Utf8PathBuf), ProbeError> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_str().is_empty() => dir,
        _ => Utf8Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| ProbeError::InvalidArgs(format!("config path {path} has no file name")))?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|source| {
        ProbeError::ConfigDir {
            path: parent.to_path_buf(),
            source,
        }
    })?;
    Ok((dir, Utf8PathBuf::from(file_name)))
}

fn scope_for(project: Option<&str>) -> Result<BoardScope, ProbeError> {
    Ok(match project {
        Some(id) => BoardScope::Project(ProjectId::new(id)?),
        None => BoardScope::All,
    })
}

fn run_probe(args: impl Iterator<Item = String>) -> Result<(), ProbeError> {
    let ProbeArgs {
        config_path,
        project,
    } = parse_args(args)?;
    let (dir, file_name) = open_config_dir(&config_path)?;
    let config = EngineConfig::load(&dir, &file_name)?;
    let fallback = match &config.fallback_dataset {
        Some(dataset) => FallbackDataset::load(&dir, dataset)?,
        None => FallbackDataset::builtin(),
    };
    let scope = scope_for(project.as_deref())?;
    let session = SessionContext::new(ActorId::new(PROBE_ACTOR)?);
    let store = HttpTaskStore::new(&config.http)?;
    info!(base_url = %store.base_url(), %scope, "probing task store");

    let engine = SyncEngine::new(
        Arc::new(store),
        Arc::new(DefaultClock),
        Arc::new(fallback),
        config.sync,
    )
    .with_vocabulary(config.vocabulary);

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(ProbeError::RuntimeInit)?;
    let report = runtime.block_on(engine.load_board(&session, &scope));
    let snapshot = report.snapshot();
    let counts = snapshot.board().counts();
    for attempt in snapshot.attempts() {
        warn!(tier = attempt.tier().name(), reason = %attempt.failure(), "tier skipped");
    }
    info!(
        provenance = %snapshot.provenance(),
        todo = counts.get(ColumnState::Todo),
        doing = counts.get(ColumnState::Doing),
        done = counts.get(ColumnState::Done),
        unrecognized = snapshot.board().unrecognized().count(),
        loaded_at = %snapshot.loaded_at(),
        "board probe complete"
    );
    Ok(())
}
