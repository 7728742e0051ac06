//! Turn-taking rules for non-moderator participants.

pub mod gate;

pub use gate::{GateState, TurnGate};
