//! Decision engine port
//!
//! The moderator's planner, treated as a function from
//! (roster, history, trigger) to an ordered list of messages. How it reasons is
//! not the core's concern; a failure is reported as [`DecisionError`] and
//! recovered by the fallback path.

use async_trait::async_trait;
use noa_domain::{Decision, DecisionError, DecisionRequest};

#[async_trait]
pub trait DecisionEngine: Send + Sync {
    /// Decide which messages to publish next. Never retried on failure.
    async fn decide(&self, request: &DecisionRequest) -> Result<Decision, DecisionError>;
}
