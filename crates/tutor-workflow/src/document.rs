use crate::artifact::{Artifact, ArtifactSink};
use crate::error::{Result, WorkflowError};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tutor_client::TutorBackend;
use tutor_types::Topic;

/// Shown when the backend rejects the request (HTTP 400)
pub const INVALID_REQUEST_MESSAGE: &str = "Failed to create KTP. Please try again.";

/// Shown for every other failure
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to create KTP.";

/// Status of KTP generation.
///
/// `Succeeded` and `Failed` are transient: the workflow passes through them
/// and settles back on `Idle` at the end of every attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GenerationState {
    #[default]
    Idle,
    Generating,
    Succeeded,
    Failed(String),
}

impl GenerationState {
    /// Whether the surrounding view should show its loading indicator
    pub fn is_blocking(&self) -> bool {
        matches!(self, GenerationState::Generating)
    }

    /// User-facing message for a failed attempt
    pub fn failure_message(error: &WorkflowError) -> &'static str {
        if error.is_invalid_request() {
            INVALID_REQUEST_MESSAGE
        } else {
            GENERIC_FAILURE_MESSAGE
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Another attempt was already generating; nothing was sent
    AlreadyRunning,

    /// The artifact was delivered exactly once
    Delivered { file_name: String, path: PathBuf },

    /// The attempt failed; `message` is what the view displays
    Failed { message: String },

    /// The workflow was detached mid-flight; the response was dropped
    Discarded,
}

/// KTP generation state machine for one topic-viewing session
#[derive(Clone)]
pub struct DocumentWorkflow {
    backend: Arc<dyn TutorBackend>,
    sink: Arc<dyn ArtifactSink>,
    state: Arc<watch::Sender<GenerationState>>,
    notice: Arc<Mutex<Option<String>>>,
    detached: Arc<AtomicBool>,
}

impl DocumentWorkflow {
    pub fn new(backend: Arc<dyn TutorBackend>, sink: Arc<dyn ArtifactSink>) -> Self {
        let (state, _) = watch::channel(GenerationState::Idle);

        Self {
            backend,
            sink,
            state: Arc::new(state),
            notice: Arc::new(Mutex::new(None)),
            detached: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn state(&self) -> GenerationState {
        self.state.borrow().clone()
    }

    pub fn is_blocking(&self) -> bool {
        self.state.borrow().is_blocking()
    }

    /// Watch every state change
    pub fn subscribe(&self) -> watch::Receiver<GenerationState> {
        self.state.subscribe()
    }

    /// Failure message from the latest attempt, kept until the next one starts
    pub async fn notice(&self) -> Option<String> {
        self.notice.lock().await.clone()
    }

    /// Stop delivering results; an in-flight request still completes but its
    /// response is dropped
    pub fn detach(&self) {
        self.detached.store(true, Ordering::SeqCst);
    }

    /// Generate and deliver the KTP for `topic`.
    ///
    /// A call made while another attempt is `Generating` returns
    /// [`GenerationOutcome::AlreadyRunning`] without touching the backend.
    pub async fn generate(&self, topic: &Topic) -> GenerationOutcome {
        let started = self.state.send_if_modified(|state| {
            if state.is_blocking() {
                false
            } else {
                *state = GenerationState::Generating;
                true
            }
        });

        if !started {
            tracing::debug!(topic = %topic.name, "KTP generation already in flight");
            return GenerationOutcome::AlreadyRunning;
        }

        *self.notice.lock().await = None;
        tracing::info!(topic = %topic.name, "Generating KTP");

        let result = self.create_and_deliver(topic).await;

        match result {
            Ok(Some(path)) => {
                self.settle(GenerationState::Succeeded);
                GenerationOutcome::Delivered {
                    file_name: topic.document_file_name(),
                    path,
                }
            }
            Ok(None) => {
                self.settle(GenerationState::Idle);
                GenerationOutcome::Discarded
            }
            Err(e) if self.detached.load(Ordering::SeqCst) => {
                tracing::debug!(
                    topic = %topic.name,
                    "Workflow detached; dropping failure: {}",
                    e
                );
                self.settle(GenerationState::Idle);
                GenerationOutcome::Discarded
            }
            Err(e) => {
                let message = GenerationState::failure_message(&e).to_string();
                tracing::error!(topic = %topic.name, "KTP generation failed: {}", e);

                *self.notice.lock().await = Some(message.clone());
                self.settle(GenerationState::Failed(message.clone()));
                GenerationOutcome::Failed { message }
            }
        }
    }

    async fn create_and_deliver(&self, topic: &Topic) -> Result<Option<PathBuf>> {
        let bytes = self.backend.create_document(&topic.name).await?;

        if self.detached.load(Ordering::SeqCst) {
            tracing::debug!(topic = %topic.name, "Workflow detached; dropping KTP");
            return Ok(None);
        }

        let artifact = Artifact::for_topic(topic, bytes);
        let path = self.sink.deliver(artifact).await?;
        Ok(Some(path))
    }

    /// Pass through the terminal state and return to `Idle`
    fn settle(&self, terminal: GenerationState) {
        if terminal != GenerationState::Idle {
            self.state.send_replace(terminal);
        }
        self.state.send_replace(GenerationState::Idle);
    }
}
