//! In-memory adapters for board reconciliation.

mod task_store;

pub use task_store::{InMemoryTaskStore, InjectedFailure, StoreOperation};
