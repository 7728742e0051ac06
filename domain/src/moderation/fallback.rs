//! Recovery when the decision engine fails: announce, then return the floor
//! to the human proxy.

use crate::moderation::decision::DecisionError;
use crate::protocol::identity::{MODERATOR, USER_PROXY};
use crate::protocol::message::Message;

/// Prefix of the failure announcement.
pub const FALLBACK_PREFIX: &str = "Moderator failed";

/// The two messages published on a decision failure, in publish order.
pub fn fallback_messages(error: &DecisionError) -> [Message; 2] {
    [
        Message::chat(MODERATOR, format!("{}: {}", FALLBACK_PREFIX, error)),
        Message::request_to_speak(MODERATOR, USER_PROXY),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_announces_then_grants_user_proxy() {
        let [notice, grant] = fallback_messages(&DecisionError::new("Invalid JSON output"));

        assert_eq!(
            notice,
            Message::chat("moderator", "Moderator failed: Invalid JSON output")
        );
        assert_eq!(grant, Message::request_to_speak("moderator", "user-proxy"));
    }
}
