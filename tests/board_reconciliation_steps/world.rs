//! Shared world state for board reconciliation BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskboard::board::{
    adapters::{fallback::FallbackDataset, memory::InMemoryTaskStore},
    domain::{ActorId, SessionContext, StatusClassifier},
    services::{
        LoadReport, PendingCount, PendingWorkCounter, SyncEngine, TieredReader, TransitionReport,
    },
};
use taskboard::config::SyncConfig;

/// Engine type used by the BDD world.
pub type TestEngine = SyncEngine<InMemoryTaskStore, DefaultClock>;

/// Scenario world for board reconciliation behaviour tests.
pub struct BoardWorld {
    pub store: InMemoryTaskStore,
    pub engine: TestEngine,
    pub pending: PendingWorkCounter<InMemoryTaskStore>,
    pub session: Option<SessionContext>,
    pub last_load: Option<LoadReport>,
    pub last_transition: Option<TransitionReport>,
    pub last_pending: Option<PendingCount>,
}

impl BoardWorld {
    /// Creates a world over an empty store.
    #[must_use]
    pub fn new() -> Self {
        let store = InMemoryTaskStore::new();
        let shared = Arc::new(store.clone());
        let fallback = Arc::new(FallbackDataset::builtin());
        let engine = SyncEngine::new(
            Arc::clone(&shared),
            Arc::new(DefaultClock),
            Arc::clone(&fallback),
            SyncConfig::fast(),
        );
        let pending = PendingWorkCounter::new(
            TieredReader::new(shared, fallback, SyncConfig::fast()),
            Arc::new(StatusClassifier::default()),
        );

        Self {
            store,
            engine,
            pending,
            session: None,
            last_load: None,
            last_transition: None,
            last_pending: None,
        }
    }

    /// Returns the scenario session.
    ///
    /// # Errors
    ///
    /// Returns an error when no session step has run.
    pub fn session(&self) -> Result<&SessionContext, eyre::Report> {
        self.session
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing session in scenario world"))
    }

    /// Returns the actor of the scenario session.
    ///
    /// # Errors
    ///
    /// Returns an error when no session step has run.
    pub fn actor(&self) -> Result<ActorId, eyre::Report> {
        Ok(self.session()?.actor().clone())
    }
}

impl Default for BoardWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BoardWorld {
    BoardWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
