//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! must implement.

pub mod conversation_logger;
pub mod cycle_observer;
pub mod decision_engine;
pub mod operator;
pub mod responder;
pub mod roster_source;
pub mod transport;
