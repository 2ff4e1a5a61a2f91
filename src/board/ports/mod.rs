//! Port contracts for board reconciliation.
//!
//! Ports define infrastructure-agnostic interfaces used by board services.

pub mod task_store;

pub use task_store::{TaskStore, TaskStoreError, TaskStoreResult};
