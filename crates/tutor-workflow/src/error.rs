use thiserror::Error;
use tutor_client::ApiError;

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Backend error: {0}")]
    Api(#[from] ApiError),

    #[error("Failed to save artifact: {0}")]
    Artifact(#[from] std::io::Error),
}

impl WorkflowError {
    /// True when the backend rejected the request itself (HTTP 400)
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, WorkflowError::Api(e) if e.is_invalid_request())
    }
}

pub type Result<T> = std::result::Result<T, WorkflowError>;
