//! Directory roster loader
//!
//! This module provides [`DirectoryRosterSource`], the [`RosterSource`]
//! implementation that reads assistant spec files from a directory.
//!
//! # File format
//!
//! Every `*.json` file in the directory describes one assistant:
//!
//! ```json
//! { "name": "PDF Assistant", "description": "Answers questions about PDFs" }
//! ```
//!
//! Other fields are ignored. Names are normalized (`pdf-assistant`).
//! Files are read in file-name order so the rendered roster is stable.

use noa_application::{RosterLoad, RosterLoadError, RosterSource};
use noa_domain::{Roster, RosterEntry};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct AssistantSpec {
    name: String,
    description: String,
}

/// Roster source backed by a directory of JSON spec files.
#[derive(Debug, Clone)]
pub struct DirectoryRosterSource {
    dir: PathBuf,
}

impl DirectoryRosterSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn spec_files(&self) -> std::io::Result<Vec<PathBuf>> {
        let mut files: Vec<PathBuf> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        files.sort();
        Ok(files)
    }

    fn read_entry(path: &Path) -> Result<RosterEntry, String> {
        let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
        let spec: AssistantSpec = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        let entry = RosterEntry::new(&spec.name, spec.description);
        if entry.name().is_empty() {
            return Err("empty name".to_string());
        }
        Ok(entry)
    }
}

impl RosterSource for DirectoryRosterSource {
    fn load(&self) -> RosterLoad {
        let files = match self.spec_files() {
            Ok(files) => files,
            Err(e) => {
                warn!(
                    "Could not read agents directory {}: {}",
                    self.dir.display(),
                    e
                );
                return RosterLoad::default();
            }
        };

        let mut entries = Vec::new();
        let mut skipped = Vec::new();
        for path in files {
            match Self::read_entry(&path) {
                Ok(entry) => {
                    debug!("Roster entry {} from {}", entry.name(), path.display());
                    entries.push(entry);
                }
                Err(reason) => {
                    skipped.push(RosterLoadError::new(path.display().to_string(), reason));
                }
            }
        }

        RosterLoad {
            roster: Roster::new(entries),
            skipped,
        }
    }
}
