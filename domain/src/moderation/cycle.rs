//! States of the moderator's dispatch cycle.
//!
//! ```text
//! Idle ──▶ Received ──▶ Deciding ──▶ Dispatching ──▶ Idle
//!             │             │
//!             │             └──────▶ Fallback ─────▶ Idle
//!             └─────────────────────────────────────▶ Idle   (non-chat message)
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CycleState {
    /// No message being processed.
    #[default]
    Idle,
    /// A message has arrived and been recorded.
    Received,
    /// The decision engine is running.
    Deciding,
    /// Publishing the engine's messages.
    Dispatching,
    /// Publishing the failure notice and handing the floor to the human proxy.
    Fallback,
}

impl CycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CycleState::Idle => "idle",
            CycleState::Received => "received",
            CycleState::Deciding => "deciding",
            CycleState::Dispatching => "dispatching",
            CycleState::Fallback => "fallback",
        }
    }

    /// Whether moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(&self, next: CycleState) -> bool {
        use CycleState::*;
        matches!(
            (self, next),
            (Idle, Received)
                | (Received, Deciding)
                | (Received, Idle)
                | (Deciding, Dispatching)
                | (Deciding, Fallback)
                | (Dispatching, Idle)
                | (Fallback, Idle)
        )
    }
}

impl std::fmt::Display for CycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CycleState::*;

    #[test]
    fn test_happy_path_transitions() {
        let path = [Idle, Received, Deciding, Dispatching, Idle];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_fallback_path_transitions() {
        let path = [Idle, Received, Deciding, Fallback, Idle];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]));
        }
    }

    #[test]
    fn test_no_reentry_while_busy() {
        assert!(!Deciding.can_transition_to(Received));
        assert!(!Dispatching.can_transition_to(Received));
        assert!(!Fallback.can_transition_to(Deciding));
        assert!(!Idle.can_transition_to(Deciding));
    }
}
