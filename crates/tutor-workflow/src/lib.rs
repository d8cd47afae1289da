//! # Tutor workflow
//!
//! State for the topic-detail view of the tutor client:
//!
//! - **Conversation** with the AI tutor, with overlapping questions appended safely
//! - **KTP generation** as an explicit state machine with exactly-once delivery
//! - **Topic session** tying both to the currently opened topic
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tutor_client::{HttpTutorClient, SessionGuard};
//! use tutor_workflow::{DirectorySink, TopicSession};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = Arc::new(HttpTutorClient::new(
//!         "http://localhost:5000/api",
//!         SessionGuard::in_memory(),
//!     )?);
//!     let sink = Arc::new(DirectorySink::new("downloads"));
//!
//!     let session = TopicSession::open(client, sink, 1).await?;
//!     session.ask("What is a carbon footprint?").await?;
//!     session.create_document().await;
//!
//!     Ok(())
//! }
//! ```

pub mod artifact;
pub mod conversation;
pub mod document;
pub mod error;
pub mod topic_session;

pub use artifact::{Artifact, ArtifactSink, DirectorySink};
pub use conversation::{ConversationStore, Submission};
pub use document::{
    DocumentWorkflow, GenerationOutcome, GenerationState, GENERIC_FAILURE_MESSAGE,
    INVALID_REQUEST_MESSAGE,
};
pub use error::{Result, WorkflowError};
pub use topic_session::TopicSession;
