//! Message protocol: the tagged unit of exchange and its payload codec.
//!
//! On the wire every message is a UTF-8 JSON object whose `type` field names
//! the variant:
//!
//! ```text
//! {"type":"ChatMessage","author":"user-proxy","message":"hello"}
//! {"type":"RequestToSpeak","author":"moderator","target":"pdf-assistant"}
//! ```
//!
//! Any other `type` value is rejected with [`DecodeError::UnknownType`];
//! participants drop such payloads without touching their state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Discriminator values accepted on the wire.
pub const CHAT_MESSAGE_TYPE: &str = "ChatMessage";
pub const REQUEST_TO_SPEAK_TYPE: &str = "RequestToSpeak";

/// A message exchanged over the shared channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Message {
    /// A content utterance.
    ChatMessage { author: String, message: String },
    /// A floor grant: `target` may act next.
    RequestToSpeak { author: String, target: String },
}

impl Message {
    pub fn chat(author: impl Into<String>, message: impl Into<String>) -> Self {
        Message::ChatMessage {
            author: author.into(),
            message: message.into(),
        }
    }

    pub fn request_to_speak(author: impl Into<String>, target: impl Into<String>) -> Self {
        Message::RequestToSpeak {
            author: author.into(),
            target: target.into(),
        }
    }

    /// The wire discriminator of this variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            Message::ChatMessage { .. } => CHAT_MESSAGE_TYPE,
            Message::RequestToSpeak { .. } => REQUEST_TO_SPEAK_TYPE,
        }
    }

    pub fn author(&self) -> &str {
        match self {
            Message::ChatMessage { author, .. } | Message::RequestToSpeak { author, .. } => author,
        }
    }

    pub fn is_chat(&self) -> bool {
        matches!(self, Message::ChatMessage { .. })
    }

    /// Whether this message grants the floor to `participant`.
    pub fn grants_floor_to(&self, participant: &str) -> bool {
        matches!(self, Message::RequestToSpeak { target, .. } if target == participant)
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Message::ChatMessage { author, message } => write!(f, "{}: {}", author, message),
            Message::RequestToSpeak { author, target } => {
                write!(f, "{} grants the floor to {}", author, target)
            }
        }
    }
}

/// Reasons a payload cannot be interpreted as a [`Message`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Malformed message: {0}")]
    Malformed(String),

    #[error("Unknown message type: {0}")]
    UnknownType(String),
}

/// Encode a message into its wire payload.
pub fn encode(message: &Message) -> Vec<u8> {
    // A struct-like enum with only String fields always serializes.
    serde_json::to_vec(message).unwrap_or_default()
}

/// Decode a wire payload into a [`Message`].
pub fn decode(payload: &[u8]) -> Result<Message, DecodeError> {
    let text = std::str::from_utf8(payload)
        .map_err(|e| DecodeError::Malformed(format!("payload is not UTF-8: {}", e)))?;
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| DecodeError::Malformed(format!("payload is not JSON: {}", e)))?;
    from_value(value)
}

/// Interpret an already-parsed JSON value as a [`Message`].
///
/// Shared by [`decode`] and by decision parsing, which receives messages
/// embedded in a larger JSON document.
pub fn from_value(value: serde_json::Value) -> Result<Message, DecodeError> {
    let Some(object) = value.as_object() else {
        return Err(DecodeError::Malformed("expected a JSON object".to_string()));
    };

    let type_name = match object.get("type") {
        Some(serde_json::Value::String(t)) => t.clone(),
        Some(other) => {
            return Err(DecodeError::Malformed(format!(
                "`type` must be a string, got {}",
                other
            )));
        }
        None => return Err(DecodeError::Malformed("missing field `type`".to_string())),
    };

    if type_name != CHAT_MESSAGE_TYPE && type_name != REQUEST_TO_SPEAK_TYPE {
        return Err(DecodeError::UnknownType(type_name));
    }

    serde_json::from_value(value).map_err(|e| DecodeError::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_uses_type_discriminator() {
        let payload = encode(&Message::chat("user-proxy", "hello"));
        let value: serde_json::Value = serde_json::from_slice(&payload).unwrap();
        assert_eq!(value["type"], "ChatMessage");
        assert_eq!(value["author"], "user-proxy");
        assert_eq!(value["message"], "hello");

        let payload = encode(&Message::request_to_speak("moderator", "pdf-assistant"));
        let value: serde_json::Value = serde_json::from_slice(&payload).unwrap();
        assert_eq!(value["type"], "RequestToSpeak");
        assert_eq!(value["target"], "pdf-assistant");
    }

    #[test]
    fn test_decode_wire_examples() {
        let chat = decode(br#"{"type":"ChatMessage","author":"user-proxy","message":"hi"}"#).unwrap();
        assert_eq!(chat, Message::chat("user-proxy", "hi"));

        let grant =
            decode(br#"{"type":"RequestToSpeak","author":"moderator","target":"user-proxy"}"#)
                .unwrap();
        assert!(grant.grants_floor_to("user-proxy"));
        assert!(!grant.grants_floor_to("pdf-assistant"));
    }

    #[test]
    fn test_decode_ignores_extra_fields() {
        let msg = decode(
            br#"{"type":"ChatMessage","author":"a","message":"b","timestamp":"2024-01-01"}"#,
        )
        .unwrap();
        assert_eq!(msg, Message::chat("a", "b"));
    }

    #[test]
    fn test_decode_unknown_type() {
        let err = decode(br#"{"type":"Unknown","author":"x"}"#).unwrap_err();
        assert_eq!(err, DecodeError::UnknownType("Unknown".to_string()));
    }

    #[test]
    fn test_decode_type_is_case_sensitive() {
        let err = decode(br#"{"type":"chatmessage","author":"a","message":"b"}"#).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownType(_)));
    }

    #[test]
    fn test_decode_missing_field_is_malformed() {
        let err = decode(br#"{"type":"RequestToSpeak","author":"moderator"}"#).unwrap_err();
        assert!(matches!(err, DecodeError::Malformed(_)));

        let err = decode(br#"{"author":"moderator","message":"x"}"#).unwrap_err();
        assert!(matches!(err, DecodeError::Malformed(_)));
    }

    #[test]
    fn test_decode_non_text_payloads_are_malformed() {
        assert!(matches!(
            decode(&[0xff, 0xfe, 0x00]).unwrap_err(),
            DecodeError::Malformed(_)
        ));
        assert!(matches!(
            decode(b"not json").unwrap_err(),
            DecodeError::Malformed(_)
        ));
        assert!(matches!(
            decode(b"[1,2,3]").unwrap_err(),
            DecodeError::Malformed(_)
        ));
        assert!(matches!(
            decode(br#"{"type":7}"#).unwrap_err(),
            DecodeError::Malformed(_)
        ));
    }

    #[test]
    fn test_decode_wrong_field_type_is_malformed() {
        let err = decode(br#"{"type":"ChatMessage","author":"a","message":42}"#).unwrap_err();
        assert!(matches!(err, DecodeError::Malformed(_)));
    }

    #[test]
    fn test_author_and_display() {
        let chat = Message::chat("pdf-assistant", "The answer is 42");
        assert_eq!(chat.author(), "pdf-assistant");
        assert!(chat.is_chat());
        assert_eq!(chat.to_string(), "pdf-assistant: The answer is 42");
        assert_eq!(chat.type_name(), CHAT_MESSAGE_TYPE);
    }
}
