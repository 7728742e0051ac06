//! Decision parsing from free-text engine output.
//!
//! Accepts either a fenced code block (` ```json ` or bare ` ``` `) or a raw
//! JSON document. The document must be an object with a `messages` array; each
//! element must decode as a protocol [`Message`]. Anything else is a
//! [`DecisionError`]; no leniency beyond that.

use crate::moderation::decision::{Decision, DecisionError};
use crate::protocol::message::{Message, from_value};

/// Parse engine output text into a [`Decision`].
pub fn parse_decision(response: &str) -> Result<Decision, DecisionError> {
    let body = extract_json_block(response).unwrap_or_else(|| response.trim().to_string());

    let value: serde_json::Value = serde_json::from_str(&body)
        .map_err(|e| DecisionError::new(format!("Invalid JSON output: {}", e)))?;

    parse_decision_json(value)
}

/// Validate an already-parsed JSON document as a [`Decision`].
pub fn parse_decision_json(value: serde_json::Value) -> Result<Decision, DecisionError> {
    let serde_json::Value::Object(mut object) = value else {
        return Err(DecisionError::new("Expected a JSON object with a `messages` array"));
    };

    let items = match object.remove("messages") {
        Some(serde_json::Value::Array(items)) => items,
        Some(_) => return Err(DecisionError::new("`messages` must be an array")),
        None => return Err(DecisionError::new("Missing `messages` field")),
    };

    let messages = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            from_value(item).map_err(|e| DecisionError::new(format!("messages[{}]: {}", index, e)))
        })
        .collect::<Result<Vec<Message>, _>>()?;

    Ok(Decision::new(messages))
}

/// Contents of the first fenced code block, if any.
fn extract_json_block(response: &str) -> Option<String> {
    let mut in_block = false;
    let mut block = String::new();

    for line in response.lines() {
        let trimmed = line.trim();
        if !in_block && (trimmed == "```json" || trimmed == "```") {
            in_block = true;
            block.clear();
        } else if in_block && trimmed == "```" {
            return Some(block);
        } else if in_block {
            block.push_str(line);
            block.push('\n');
        }
    }

    None
}
