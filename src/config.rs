//! Engine configuration.
//!
//! Configuration is plain data with defaults and named presets. It can be
//! deserialized from a JSON file read through a capability directory:
//!
//! ```json
//! {
//!   "http": { "base_url": "https://tasks.example.com/api", "timeout_ms": 5000 },
//!   "sync": { "tier_timeout_ms": 8000, "empty_result_policy": "fall_through" },
//!   "vocabulary": { "todo": "To Do", "doing": "In Progress", "done": "Done" },
//!   "fallback_dataset": "fallback-tasks.json"
//! }
//! ```

use crate::board::domain::ColumnState;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::fs_utf8::Dir;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        /// Path relative to the capability directory.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid.
    #[error("failed to parse config {path}: {source}")]
    Parse {
        /// Path relative to the capability directory.
        path: Utf8PathBuf,
        /// Parser error.
        #[source]
        source: serde_json::Error,
    },
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Remote store connection settings.
    pub http: HttpStoreConfig,
    /// Read/write policy for the sync engine.
    pub sync: SyncConfig,
    /// Status strings written back per column.
    pub vocabulary: StatusVocabulary,
    /// Optional JSON file replacing the built-in fallback dataset, relative
    /// to the configuration directory.
    pub fallback_dataset: Option<Utf8PathBuf>,
}

impl EngineConfig {
    /// Loads configuration from a JSON file inside a capability directory.
    ///
    /// Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed.
    pub fn load(dir: &Dir, path: &Utf8Path) -> Result<Self, ConfigError> {
        let payload = dir.read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&payload).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns the parser error when the text is not a valid configuration.
    pub fn from_json(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }
}

/// Connection settings for the HTTP task store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HttpStoreConfig {
    /// Base URL; task endpoints are resolved beneath it.
    pub base_url: String,
    /// Per-request transport timeout in milliseconds.
    pub timeout_ms: u64,
    /// User agent sent with each request.
    pub user_agent: String,
    /// Optional bearer token.
    pub bearer_token: Option<String>,
}

impl Default for HttpStoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_owned(),
            timeout_ms: 10_000,
            user_agent: concat!("taskboard/", env!("CARGO_PKG_VERSION")).to_owned(),
            bearer_token: None,
        }
    }
}

impl HttpStoreConfig {
    /// Creates settings for a base URL with default timeouts.
    #[must_use]
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// How an empty result from a live tier is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyResultPolicy {
    /// An empty live result moves on to the next tier.
    #[default]
    FallThrough,
    /// An empty live result is authoritative.
    Accept,
}

/// How concurrent loads are ordered when publishing boards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequencePolicy {
    /// Publish only boards from the most recently issued load.
    #[default]
    DiscardStale,
    /// Publish whichever response completes last.
    LastResponseWins,
}

/// Read/write policy for the sync engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Upper bound for a single read tier, in milliseconds.
    pub tier_timeout_ms: u64,
    /// Upper bound for a status write, in milliseconds.
    pub write_timeout_ms: u64,
    /// Treatment of empty live results.
    pub empty_result_policy: EmptyResultPolicy,
    /// Ordering of concurrent loads.
    pub sequence_policy: SequencePolicy,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            tier_timeout_ms: 15_000,
            write_timeout_ms: 15_000,
            empty_result_policy: EmptyResultPolicy::FallThrough,
            sequence_policy: SequencePolicy::DiscardStale,
        }
    }
}

impl SyncConfig {
    /// Creates a configuration with short timeouts for tests and probes.
    #[must_use]
    pub const fn fast() -> Self {
        Self {
            tier_timeout_ms: 500,
            write_timeout_ms: 500,
            empty_result_policy: EmptyResultPolicy::FallThrough,
            sequence_policy: SequencePolicy::DiscardStale,
        }
    }

    /// Returns the per-tier read timeout.
    #[must_use]
    pub const fn tier_timeout(&self) -> Duration {
        Duration::from_millis(self.tier_timeout_ms)
    }

    /// Returns the write timeout.
    #[must_use]
    pub const fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }

    /// Sets the empty-result policy.
    #[must_use]
    pub const fn with_empty_result_policy(mut self, policy: EmptyResultPolicy) -> Self {
        self.empty_result_policy = policy;
        self
    }

    /// Sets the sequence policy.
    #[must_use]
    pub const fn with_sequence_policy(mut self, policy: SequencePolicy) -> Self {
        self.sequence_policy = policy;
        self
    }

    /// Sets the per-tier read timeout.
    #[must_use]
    pub fn with_tier_timeout(mut self, timeout: Duration) -> Self {
        self.tier_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }
}

/// Status text written to the remote store when a task moves to a column.
///
/// Each value must classify back to its own column.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StatusVocabulary {
    /// Status for the todo column.
    pub todo: String,
    /// Status for the doing column.
    pub doing: String,
    /// Status for the done column.
    pub done: String,
}

impl Default for StatusVocabulary {
    fn default() -> Self {
        Self {
            todo: "To Do".to_owned(),
            doing: "In Progress".to_owned(),
            done: "Done".to_owned(),
        }
    }
}

impl StatusVocabulary {
    /// Returns the status written for a column.
    #[must_use]
    pub fn status_for(&self, column: ColumnState) -> &str {
        match column {
            ColumnState::Todo => &self.todo,
            ColumnState::Doing => &self.doing,
            ColumnState::Done => &self.done,
        }
    }
}
