//! Roster source port
//!
//! Loads the participant roster once per moderator run. Loading tolerates bad
//! entries: each one is reported in [`RosterLoad::skipped`] and left out.

use noa_domain::Roster;
use thiserror::Error;

/// One participant specification that could not be loaded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Skipping roster entry {source_name}: {reason}")]
pub struct RosterLoadError {
    /// Where the entry came from (e.g. a file path).
    pub source_name: String,
    pub reason: String,
}

impl RosterLoadError {
    pub fn new(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }
}

/// Result of a roster load: the usable entries plus what was skipped.
#[derive(Debug, Clone, Default)]
pub struct RosterLoad {
    pub roster: Roster,
    pub skipped: Vec<RosterLoadError>,
}

pub trait RosterSource: Send + Sync {
    fn load(&self) -> RosterLoad;
}

/// A fixed roster, for tests and embedding.
pub struct StaticRoster(pub Roster);

impl RosterSource for StaticRoster {
    fn load(&self) -> RosterLoad {
        RosterLoad {
            roster: self.0.clone(),
            skipped: Vec::new(),
        }
    }
}
