//! Taskboard: task status classification and resilient board reconciliation.
//!
//! Task records live in a remote store whose status text is free-form. This
//! crate classifies those statuses into three board columns, loads boards
//! through a chain of read tiers that degrades to a local dataset, and
//! persists column moves with a mandatory reload afterwards.
//!
//! # Architecture
//!
//! Taskboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure classification, board and drop-resolution logic
//! - **Ports**: The [`board::ports::TaskStore`] contract for the remote store
//! - **Adapters**: HTTP, in-memory and fallback-dataset implementations
//!
//! # Modules
//!
//! - [`board`]: Classification, board model and the sync engine
//! - [`config`]: Engine configuration and presets
//! - [`telemetry`]: Log subscriber setup for binaries

pub mod board;
pub mod config;
pub mod telemetry;
