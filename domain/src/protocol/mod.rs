//! Wire protocol shared by every participant.
//!
//! - [`message::Message`]: the tagged unit of exchange (`ChatMessage` / `RequestToSpeak`)
//! - [`message::encode`] / [`message::decode`]: payload codec
//! - [`identity`]: reserved identities and participant name normalisation

pub mod identity;
pub mod message;
