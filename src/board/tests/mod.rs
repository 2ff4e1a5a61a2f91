//! Unit tests for the board module.
//!
//! Tests are organised by component: classification, board building, drop
//! resolution, payload decoding and the sync services.
