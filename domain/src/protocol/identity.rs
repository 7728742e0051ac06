//! Participant identities.
//!
//! Two identities are reserved and fixed: the moderator and the human proxy.
//! Every other participant is named after its roster entry, normalised the
//! same way the roster normalises names so `target` comparisons line up.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Reserved identity of the moderator.
pub const MODERATOR: &str = "moderator";

/// Reserved identity of the human proxy.
pub const USER_PROXY: &str = "user-proxy";

/// Normalise a participant name: lowercase, trimmed, spaces replaced by hyphens.
pub fn normalize_name(raw: &str) -> String {
    raw.trim().to_lowercase().replace(' ', "-")
}

/// Identity of a participant on the shared channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Creates an identity from a raw name, normalising it.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(normalize_name(raw.as_ref()))
    }

    /// Identity for an assistant: must be non-empty and not reserved.
    pub fn assistant(raw: impl AsRef<str>) -> Result<Self, DomainError> {
        let id = Self::new(raw.as_ref());
        if id.0.is_empty() {
            return Err(DomainError::InvalidParticipant(raw.as_ref().to_string()));
        }
        if id.is_reserved() {
            return Err(DomainError::ReservedIdentity(id.0));
        }
        Ok(id)
    }

    pub fn moderator() -> Self {
        Self(MODERATOR.to_string())
    }

    pub fn user_proxy() -> Self {
        Self(USER_PROXY.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this identity is one of the reserved well-known ones.
    pub fn is_reserved(&self) -> bool {
        self.0 == MODERATOR || self.0 == USER_PROXY
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq<str> for ParticipantId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ParticipantId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
