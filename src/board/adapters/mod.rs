//! Adapter implementations for board reconciliation ports.

pub mod fallback;
pub mod http;
pub mod memory;
