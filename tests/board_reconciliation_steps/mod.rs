//! Step definitions for board reconciliation scenarios.

pub mod world;

mod then;
mod when;
