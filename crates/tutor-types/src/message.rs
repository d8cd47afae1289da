use serde::{Deserialize, Serialize};

/// Position of a message within one conversation
pub type MessageId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

impl Sender {
    /// Label shown next to a message bubble
    pub fn label(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Ai => "AI Phd",
        }
    }
}

/// One turn of the transcript. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub sender: Sender,
    pub text: String,
    pub timestamp: String,
}

impl ChatMessage {
    /// Create a learner message stamped with the current local time
    pub fn user(id: MessageId, text: impl Into<String>) -> Self {
        Self {
            id,
            sender: Sender::User,
            text: text.into(),
            timestamp: clock_timestamp(),
        }
    }

    /// Create a tutor reply stamped with the current local time
    pub fn ai(id: MessageId, text: impl Into<String>) -> Self {
        Self {
            id,
            sender: Sender::Ai,
            text: text.into(),
            timestamp: clock_timestamp(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}

/// Local wall-clock time as two-digit hour and minute, e.g. `09:41`
pub fn clock_timestamp() -> String {
    chrono::Local::now().format("%H:%M").to_string()
}
