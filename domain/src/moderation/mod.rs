//! Moderation: the moderator's decision contract and recovery rules.
//!
//! - [`decision`]: what the decision engine receives and returns
//! - [`parsing`]: structural validation of free-text engine output
//! - [`cycle`]: states of the dispatch cycle
//! - [`fallback`]: messages that hand the floor back to the human proxy

pub mod cycle;
pub mod decision;
pub mod fallback;
pub mod parsing;
