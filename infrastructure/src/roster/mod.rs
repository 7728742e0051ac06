//! Roster loading from participant spec files.

mod loader;

pub use loader::DirectoryRosterSource;
