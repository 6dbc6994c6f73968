//! Stage progression rules.
//!
//! A stage is created lazily by its first message and completed at most once.
//! After completion it is a read-only transcript.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Maximum length of a single message body, in characters.
pub const MAX_MESSAGE_LENGTH: usize = 20_000;

/// Author of a stage message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageRole {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(CoreError::Validation(format!(
                "Invalid message role '{other}'. Valid roles: user, assistant"
            ))),
        }
    }
}

/// Reject writes to a stage that has already been completed.
pub fn ensure_open(completed_at: Option<Timestamp>) -> Result<(), CoreError> {
    match completed_at {
        Some(at) => Err(CoreError::Conflict(format!(
            "Stage was completed at {at} and is read-only"
        ))),
        None => Ok(()),
    }
}

/// Validate a message body (non-blank, bounded).
pub fn validate_message_content(content: &str) -> Result<(), CoreError> {
    if content.trim().is_empty() {
        return Err(CoreError::Validation(
            "Message content must not be empty".into(),
        ));
    }
    if content.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Message content must be at most {MAX_MESSAGE_LENGTH} characters"
        )));
    }
    Ok(())
}
