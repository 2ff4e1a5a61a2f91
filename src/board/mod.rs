//! Task board classification and reconciliation.
//!
//! Raw task statuses from a remote store are classified into three columns,
//! boards are loaded through an ordered chain of read tiers that degrades to
//! a local dataset, and column moves are written back and immediately
//! reconciled by reloading. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
