//! Configuration and fallback dataset loading from disk.

use crate::in_memory::helpers::{engine, session, task};
use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};
use eyre::{Result, ensure, eyre};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use std::sync::Arc;
use std::time::Duration;
use taskboard::board::{
    adapters::{
        fallback::{FallbackDataset, FallbackDatasetError},
        memory::{InMemoryTaskStore, InjectedFailure, StoreOperation},
    },
    domain::{ColumnState, Provenance, SessionContext},
    services::SyncEngine,
};
use taskboard::config::{
    ConfigError, EmptyResultPolicy, EngineConfig, SequencePolicy, SyncConfig,
};

#[fixture]
fn fixtures() -> Result<Dir> {
    let path = Utf8Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    Ok(Dir::open_ambient_dir(path, ambient_authority())?)
}

#[rstest]
fn engine_config_loads_with_defaults_for_missing_fields(fixtures: Result<Dir>) -> Result<()> {
    let dir = fixtures?;
    let config = EngineConfig::load(&dir, Utf8Path::new("engine-config.json"))?;

    ensure!(config.http.base_url == "https://tasks.example.com/api/");
    ensure!(config.http.timeout() == Duration::from_millis(2500));
    ensure!(config.http.bearer_token.as_deref() == Some("test-token"));
    ensure!(config.sync.tier_timeout() == Duration::from_millis(800));
    ensure!(config.sync.write_timeout() == Duration::from_secs(15));
    ensure!(config.sync.empty_result_policy == EmptyResultPolicy::Accept);
    ensure!(config.sync.sequence_policy == SequencePolicy::DiscardStale);
    ensure!(config.vocabulary.status_for(ColumnState::Doing) == "Doing");
    ensure!(config.vocabulary.status_for(ColumnState::Done) == "Done");
    ensure!(config.fallback_dataset.as_deref() == Some(Utf8Path::new("fallback-tasks.json")));
    Ok(())
}

#[rstest]
fn missing_config_file_reports_read_error(fixtures: Result<Dir>) -> Result<()> {
    let dir = fixtures?;
    let result = EngineConfig::load(&dir, Utf8Path::new("absent.json"));

    ensure!(matches!(result, Err(ConfigError::Read { .. })));
    Ok(())
}

#[rstest]
fn invalid_config_reports_parse_error(fixtures: Result<Dir>) -> Result<()> {
    let dir = fixtures?;
    let result = EngineConfig::load(&dir, Utf8Path::new("invalid-config.json"));

    ensure!(matches!(result, Err(ConfigError::Parse { .. })), "got {result:?}");
    Ok(())
}

#[rstest]
fn malformed_fallback_file_is_rejected(fixtures: Result<Dir>) -> Result<()> {
    let dir = fixtures?;
    let result = FallbackDataset::load(&dir, Utf8Path::new("broken-fallback.json"));

    ensure!(
        matches!(result, Err(FallbackDatasetError::Malformed { .. })),
        "got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn configured_fallback_dataset_serves_offline_boards(
    fixtures: Result<Dir>,
    session: SessionContext,
) -> Result<()> {
    let dir = fixtures?;
    let dataset = FallbackDataset::load(&dir, Utf8Path::new("fallback-tasks.json"))?;
    let store = InMemoryTaskStore::new();
    for operation in [StoreOperation::FetchByProject, StoreOperation::FetchAll] {
        store.fail(operation, InjectedFailure::Transport("offline".to_owned()))?;
    }
    let engine: SyncEngine<InMemoryTaskStore, DefaultClock> = SyncEngine::new(
        Arc::new(store),
        Arc::new(DefaultClock),
        Arc::new(dataset),
        SyncConfig::fast(),
    );

    let report = engine.load_board(&session, &session.default_scope()).await;

    let snapshot = report.snapshot();
    ensure!(snapshot.provenance() == Provenance::Fallback);
    let counts = snapshot.board().counts();
    ensure!((counts.todo, counts.doing, counts.done) == (1, 1, 1));
    ensure!(snapshot.attempts().len() == 2);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn store_recovery_returns_to_live_data(session: SessionContext) -> Result<()> {
    let store = InMemoryTaskStore::with_records([task("T-1", "WIP")]);
    store.fail(
        StoreOperation::FetchByProject,
        InjectedFailure::Transport("flaky".to_owned()),
    )?;
    store.fail(StoreOperation::FetchAll, InjectedFailure::Malformed)?;
    let engine = engine(Arc::new(store.clone()), SyncConfig::fast());

    let offline = engine.load_board(&session, &session.default_scope()).await;
    store.clear_failure(StoreOperation::FetchByProject)?;
    let online = engine.load_board(&session, &session.default_scope()).await;

    ensure!(offline.snapshot().provenance() == Provenance::Fallback);
    ensure!(online.snapshot().provenance() == Provenance::LiveScoped);
    let published = engine
        .current_board()
        .ok_or_else(|| eyre!("no board published"))?;
    ensure!(published.board().counts().doing == 1);
    Ok(())
}
