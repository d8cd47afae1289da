use crate::artifact::ArtifactSink;
use crate::conversation::{ConversationStore, Submission};
use crate::document::{DocumentWorkflow, GenerationOutcome};
use crate::error::Result;
use std::sync::Arc;
use tutor_client::TutorBackend;
use tutor_types::{Topic, TopicId};

/// Model of the topic-detail view.
///
/// Owns the fetched topic plus one conversation and one document workflow.
/// Entering a topic always starts from an empty transcript and an idle
/// workflow.
pub struct TopicSession {
    backend: Arc<dyn TutorBackend>,
    sink: Arc<dyn ArtifactSink>,
    topic: Topic,
    conversation: ConversationStore,
    documents: DocumentWorkflow,
}

impl TopicSession {
    /// Fetch the topic and enter its view
    pub async fn open(
        backend: Arc<dyn TutorBackend>,
        sink: Arc<dyn ArtifactSink>,
        topic_id: TopicId,
    ) -> Result<Self> {
        let topic = backend.fetch_topic(topic_id).await?;
        tracing::info!(topic_id = topic.id, topic = %topic.name, "Topic opened");

        Ok(Self {
            conversation: ConversationStore::new(Arc::clone(&backend)),
            documents: DocumentWorkflow::new(Arc::clone(&backend), Arc::clone(&sink)),
            backend,
            sink,
            topic,
        })
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    pub fn conversation(&self) -> &ConversationStore {
        &self.conversation
    }

    pub fn documents(&self) -> &DocumentWorkflow {
        &self.documents
    }

    pub async fn ask(&self, question: &str) -> Result<Submission> {
        self.conversation.submit_question(question).await
    }

    /// Generate and deliver this topic's KTP
    pub async fn create_document(&self) -> GenerationOutcome {
        self.documents.generate(&self.topic).await
    }

    /// Move the view to another topic.
    ///
    /// A different id refetches the topic; either way the view is re-entered
    /// with a fresh transcript and workflow. Work still in flight for the
    /// previous view is dropped when it completes. On fetch failure the
    /// current view is left untouched.
    pub async fn switch_topic(&mut self, topic_id: TopicId) -> Result<()> {
        let topic = if topic_id == self.topic.id {
            self.topic.clone()
        } else {
            self.backend.fetch_topic(topic_id).await?
        };

        self.detach().await;
        self.conversation = ConversationStore::new(Arc::clone(&self.backend));
        self.documents = DocumentWorkflow::new(Arc::clone(&self.backend), Arc::clone(&self.sink));
        self.topic = topic;

        tracing::info!(topic_id = self.topic.id, topic = %self.topic.name, "Topic re-entered");
        Ok(())
    }

    /// Leave the view
    pub async fn close(self) {
        self.detach().await;
    }

    /// Forget the session token and leave the view.
    ///
    /// The view is torn down even when the token store fails.
    pub async fn logout(self) -> Result<()> {
        let cleared = self.backend.logout();
        self.close().await;
        cleared.map_err(Into::into)
    }

    async fn detach(&self) {
        self.conversation.reset().await;
        self.documents.detach();
    }
}
