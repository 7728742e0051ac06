//! Roster entries and their rendering for the decision engine.

use crate::protocol::identity::normalize_name;
use serde::{Deserialize, Serialize};

/// A known assistant and what it can do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    name: String,
    description: String,
}

impl RosterEntry {
    /// Creates an entry, normalising `name` (lowercase, trimmed, spaces to hyphens).
    pub fn new(name: impl AsRef<str>, description: impl Into<String>) -> Self {
        Self {
            name: normalize_name(name.as_ref()),
            description: description.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Read-only snapshot of the known assistants, in load order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    pub fn new(entries: Vec<RosterEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// One `- <name>: <description>` line per entry, in order.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("- {}: {}", e.name, e.description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl FromIterator<RosterEntry> for Roster {
    fn from_iter<I: IntoIterator<Item = RosterEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
