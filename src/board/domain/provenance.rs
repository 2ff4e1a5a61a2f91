//! Provenance of board data.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which read tier produced the records on a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provenance {
    /// Scope-filtered remote read.
    LiveScoped,
    /// Unfiltered remote read after the scoped read failed.
    LiveBroad,
    /// Local fallback dataset; the remote store was unreachable.
    Fallback,
}

impl Provenance {
    /// Returns the canonical text representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LiveScoped => "live-scoped",
            Self::LiveBroad => "live-broad",
            Self::Fallback => "fallback",
        }
    }

    /// Returns `true` when the data came from the remote store.
    #[must_use]
    pub const fn is_live(self) -> bool {
        !matches!(self, Self::Fallback)
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
