#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;
use tutor_client::{ApiError, AuthToken, SessionGuard, TutorBackend};
use tutor_types::{Credentials, Topic, TopicId};
use tutor_workflow::{Artifact, ArtifactSink};

/// In-memory backend with scripted replies.
///
/// When gated, every chat and document call waits for a permit so tests can
/// hold requests in flight.
pub struct ScriptedBackend {
    session: SessionGuard,
    topics: HashMap<TopicId, Topic>,
    gate: Option<Semaphore>,
    chat_failure: Option<u16>,
    document_failure: Option<u16>,
    pub chat_calls: AtomicUsize,
    pub document_calls: AtomicUsize,
    pub topic_calls: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        let session = SessionGuard::in_memory();
        session.set_token(AuthToken::new("test-token")).unwrap();

        let topics = [
            Topic::new(1, "Technology"),
            Topic::new(2, "Education"),
            Topic::new(3, "Environment"),
        ]
        .into_iter()
        .map(|t| (t.id, t))
        .collect();

        Self {
            session,
            topics,
            gate: None,
            chat_failure: None,
            document_failure: None,
            chat_calls: AtomicUsize::new(0),
            document_calls: AtomicUsize::new(0),
            topic_calls: AtomicUsize::new(0),
        }
    }

    pub fn gated(mut self) -> Self {
        self.gate = Some(Semaphore::new(0));
        self
    }

    pub fn failing_chat(mut self, status: u16) -> Self {
        self.chat_failure = Some(status);
        self
    }

    pub fn failing_documents(mut self, status: u16) -> Self {
        self.document_failure = Some(status);
        self
    }

    /// Let `n` held calls proceed
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    pub fn chat_calls(&self) -> usize {
        self.chat_calls.load(Ordering::SeqCst)
    }

    pub fn document_calls(&self) -> usize {
        self.document_calls.load(Ordering::SeqCst)
    }

    async fn wait_for_permit(&self) {
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
    }

    fn failure(status: u16) -> ApiError {
        if status == 400 {
            ApiError::InvalidRequest {
                status,
                body: "bad request".to_string(),
            }
        } else {
            ApiError::Status {
                status,
                body: "backend failure".to_string(),
            }
        }
    }
}

pub fn answer_for(question: &str) -> String {
    format!("Answer to: {}", question)
}

#[async_trait]
impl TutorBackend for ScriptedBackend {
    fn session(&self) -> &SessionGuard {
        &self.session
    }

    async fn login(&self, _credentials: &Credentials) -> tutor_client::Result<AuthToken> {
        let token = AuthToken::new("test-token");
        self.session.set_token(token.clone())?;
        Ok(token)
    }

    async fn fetch_topic(&self, id: TopicId) -> tutor_client::Result<Topic> {
        self.topic_calls.fetch_add(1, Ordering::SeqCst);
        self.topics
            .get(&id)
            .cloned()
            .ok_or(ApiError::TopicNotFound(id))
    }

    async fn post_chat_question(&self, question: &str) -> tutor_client::Result<String> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_for_permit().await;

        match self.chat_failure {
            Some(status) => Err(Self::failure(status)),
            None => Ok(answer_for(question)),
        }
    }

    async fn create_document(&self, topic_name: &str) -> tutor_client::Result<Vec<u8>> {
        self.document_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_for_permit().await;

        match self.document_failure {
            Some(status) => Err(Self::failure(status)),
            None => Ok(format!("%PDF {}", topic_name).into_bytes()),
        }
    }
}

/// Sink that records every delivery instead of touching the filesystem
#[derive(Default)]
pub struct RecordingSink {
    delivered: Mutex<Vec<Artifact>>,
}

impl RecordingSink {
    pub fn delivered(&self) -> Vec<Artifact> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArtifactSink for RecordingSink {
    async fn deliver(&self, artifact: Artifact) -> tutor_workflow::Result<PathBuf> {
        let path = PathBuf::from(&artifact.file_name);
        self.delivered.lock().unwrap().push(artifact);
        Ok(path)
    }
}

/// Yield to other tasks until `condition` holds
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..10_000 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}

pub fn backend(backend: ScriptedBackend) -> Arc<ScriptedBackend> {
    Arc::new(backend)
}
