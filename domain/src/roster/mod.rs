//! Participant roster consulted by the moderator.

pub mod entry;

pub use entry::{Roster, RosterEntry};
