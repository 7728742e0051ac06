//! Hub wire framing: one JSON object per line, tagged by `frame`.
//!
//! ```text
//! client → hub   {"frame":"join","space":"chat","participant":"moderator"}
//! hub → client   {"frame":"joined","space":"chat"}
//! client → hub   {"frame":"publish","payload":"{\"type\":\"ChatMessage\",...}"}
//! hub → others   {"frame":"deliver","from":"moderator","payload":"..."}
//! ```
//!
//! The payload is carried as text; the hub never looks inside it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "frame", rename_all = "lowercase")]
pub enum Frame {
    Join { space: String, participant: String },
    Joined { space: String },
    Publish { payload: String },
    Deliver { from: String, payload: String },
}

impl Frame {
    /// Encode as one line, newline included.
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }

    pub fn from_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line.trim_end())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Frame::Join { .. } => "join",
            Frame::Joined { .. } => "joined",
            Frame::Publish { .. } => "publish",
            Frame::Deliver { .. } => "deliver",
        }
    }
}
