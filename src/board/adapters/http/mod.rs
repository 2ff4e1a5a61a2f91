//! HTTP adapters for board reconciliation.

mod task_store;

pub use task_store::HttpTaskStore;
