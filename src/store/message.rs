// ABOUTME: Conversation message types — who said it, what was said, and when.
// ABOUTME: Serialized as {sender, text, ts}; a missing or null ts defaults to the load time.

use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    /// Anything that is not the user renders as the bot.
    #[serde(other)]
    Bot,
}

/// A single entry in the conversation thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
    /// Epoch milliseconds.
    #[serde(
        rename = "ts",
        default = "now_millis",
        deserialize_with = "timestamp_or_now"
    )]
    pub timestamp: i64,
}

impl Message {
    /// A user message stamped with the current time.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    /// A bot message stamped with the current time.
    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Sender::Bot, text)
    }

    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
            timestamp: now_millis(),
        }
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn timestamp_or_now<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let ts: Option<i64> = Option::deserialize(deserializer)?;
    Ok(ts.unwrap_or_else(now_millis))
}
