use thiserror::Error;
use tutor_types::TopicId;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Topic not found: {0}")]
    TopicNotFound(TopicId),

    #[error("Invalid request ({status}): {body}")]
    InvalidRequest { status: u16, body: String },

    #[error("Backend error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("Invalid auth token: {0}")]
    InvalidToken(String),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

impl ApiError {
    /// True when the backend rejected the request itself (HTTP 400)
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, ApiError::InvalidRequest { .. })
    }

    /// HTTP status reported by the backend, if the call got that far
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::InvalidRequest { status, .. } | ApiError::Status { status, .. } => {
                Some(*status)
            }
            ApiError::TopicNotFound(_) => Some(404),
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Token storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Token storage is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Token storage lock poisoned")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, ApiError>;
