//! Transport adapters for the shared channel.
//!
//! - [`HubServer`]: TCP broker relaying publishes within a space
//! - [`HubTransport`]: participant-side connection to the hub
//! - [`InMemoryBus`]: the same delivery rules inside one process

mod client;
mod frame;
mod hub;
mod memory;

pub use client::HubTransport;
pub use frame::Frame;
pub use hub::{DEFAULT_ENDPOINT, HubServer};
pub use memory::{InMemoryBus, InMemoryTransport};
