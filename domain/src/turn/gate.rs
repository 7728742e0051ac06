//! Turn gate: a single binary latch per participant.
//!
//! ```text
//!            RequestToSpeak{target: owner}
//!   Blocked ───────────────────────────────▶ Released
//!      ▲                                        │
//!      └──────────── take() / reset() ◀─────────┘
//! ```
//!
//! Grants addressed to anyone else, and chat messages, leave the latch alone.
//! [`TurnGate::take`] consumes a grant exactly once.

use crate::protocol::identity::ParticipantId;
use crate::protocol::message::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Blocked,
    Released,
}

/// Floor latch owned by one participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnGate {
    owner: ParticipantId,
    state: GateState,
}

impl TurnGate {
    /// A new gate starts blocked.
    pub fn new(owner: ParticipantId) -> Self {
        Self {
            owner,
            state: GateState::Blocked,
        }
    }

    pub fn owner(&self) -> &ParticipantId {
        &self.owner
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_released(&self) -> bool {
        self.state == GateState::Released
    }

    /// Feed an observed message to the gate.
    ///
    /// Returns `true` when the message was a grant for the owner and the gate
    /// changed from blocked to released.
    pub fn observe(&mut self, message: &Message) -> bool {
        if !message.grants_floor_to(self.owner.as_str()) {
            return false;
        }
        let changed = self.state == GateState::Blocked;
        self.state = GateState::Released;
        changed
    }

    /// Consume a pending grant. Returns `true` if one was pending.
    pub fn take(&mut self) -> bool {
        let released = self.is_released();
        self.state = GateState::Blocked;
        released
    }

    /// Block the gate, discarding any pending grant.
    pub fn reset(&mut self) {
        self.state = GateState::Blocked;
    }
}
