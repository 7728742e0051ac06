//! Dispatch cycle observer port
//!
//! Callbacks fired by the moderator as its dispatch cycle moves between
//! states and publishes messages. Implementations can render progress,
//! collect metrics, or record transitions in tests.

use noa_domain::{CycleState, Message};

pub trait CycleObserver: Send + Sync {
    /// Called on every state change.
    fn on_transition(&self, from: CycleState, to: CycleState);

    /// Called after a message has been published and appended to the log.
    fn on_published(&self, _message: &Message) {}
}

/// No-op observer for when nothing is watching.
pub struct NoCycleObserver;

impl CycleObserver for NoCycleObserver {
    fn on_transition(&self, _from: CycleState, _to: CycleState) {}
}
