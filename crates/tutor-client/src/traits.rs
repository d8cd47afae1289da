use crate::error::Result;
use crate::session::{AuthToken, SessionGuard};
use async_trait::async_trait;
use tutor_types::{Credentials, Topic, TopicId};

/// Client-side contract with the tutoring backend
///
/// Every authenticated call reads the current token from [`SessionGuard`]
/// at dispatch time, so a logout takes effect for the very next call.
#[async_trait]
pub trait TutorBackend: Send + Sync {
    /// Session this backend attaches credentials from
    fn session(&self) -> &SessionGuard;

    /// Exchange credentials for a token and store it in the session
    async fn login(&self, credentials: &Credentials) -> Result<AuthToken>;

    async fn fetch_topic(&self, id: TopicId) -> Result<Topic>;

    /// Ask the tutor a question, returning its answer text
    async fn post_chat_question(&self, question: &str) -> Result<String>;

    /// Request the KTP for a topic, returning the raw PDF bytes
    async fn create_document(&self, topic_name: &str) -> Result<Vec<u8>>;

    /// Purely local: forget the stored token. No network call is made.
    fn logout(&self) -> Result<()> {
        self.session().clear_token()?;
        Ok(())
    }
}
