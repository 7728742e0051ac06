//! Use cases
//!
//! One use case per participant role, each driving the shared channel
//! through the [`Transport`](crate::ports::transport::Transport) port.

pub mod assist;
pub mod floor_gate;
pub mod moderate;
pub(crate) mod shared;
#[cfg(test)]
pub(crate) mod test_support;
pub mod user_proxy;
