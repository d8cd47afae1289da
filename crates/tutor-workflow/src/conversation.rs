use crate::error::Result;
use std::sync::Arc;
use tokio::sync::Mutex;
use tutor_client::TutorBackend;
use tutor_types::{ChatMessage, MessageId, Sender};

/// Result of a single question submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Input was empty after trimming; nothing was appended or sent
    Ignored,

    /// Both turns were appended to the transcript
    Answered {
        question: ChatMessage,
        answer: ChatMessage,
    },

    /// The conversation was reset while the request was in flight, so the
    /// reply was dropped
    Discarded { question: ChatMessage },
}

#[derive(Default)]
struct Transcript {
    messages: Vec<ChatMessage>,
    next_id: MessageId,
    // Bumped on reset so replies to an earlier session are not appended
    epoch: u64,
}

impl Transcript {
    /// Allocate the next id and append in one step
    fn append(&mut self, sender: Sender, text: String) -> ChatMessage {
        let id = self.next_id;
        self.next_id += 1;

        let message = match sender {
            Sender::User => ChatMessage::user(id, text),
            Sender::Ai => ChatMessage::ai(id, text),
        };
        self.messages.push(message.clone());
        message
    }
}

/// Ordered transcript of one topic-viewing session.
///
/// Every mutation goes through the transcript lock and operates on the
/// latest value, so overlapping submissions never lose a message. The lock
/// is never held across the backend call.
#[derive(Clone)]
pub struct ConversationStore {
    backend: Arc<dyn TutorBackend>,
    transcript: Arc<Mutex<Transcript>>,
    draft: Arc<Mutex<String>>,
    last_error: Arc<Mutex<Option<String>>>,
}

impl ConversationStore {
    pub fn new(backend: Arc<dyn TutorBackend>) -> Self {
        Self {
            backend,
            transcript: Arc::new(Mutex::new(Transcript::default())),
            draft: Arc::new(Mutex::new(String::new())),
            last_error: Arc::new(Mutex::new(None)),
        }
    }

    /// Replace the pending-input buffer
    pub async fn set_draft(&self, text: impl Into<String>) {
        *self.draft.lock().await = text.into();
    }

    pub async fn draft(&self) -> String {
        self.draft.lock().await.clone()
    }

    /// Submit whatever is currently in the pending-input buffer.
    ///
    /// The buffer is cleared only if it still holds the submitted text.
    pub async fn submit_draft(&self) -> Result<Submission> {
        let text = self.draft().await;
        self.submit_question(&text).await
    }

    /// Ask the tutor a question.
    ///
    /// Empty or whitespace-only input is ignored before anything is appended
    /// or sent. Otherwise the learner's turn is appended immediately and the
    /// tutor's reply is appended when it arrives. A failed request leaves the
    /// learner's turn in place, records the error in [`last_error`] and is
    /// returned to the caller. A reply or failure arriving after [`reset`] is
    /// dropped and reported as [`Submission::Discarded`].
    ///
    /// [`last_error`]: ConversationStore::last_error
    /// [`reset`]: ConversationStore::reset
    pub async fn submit_question(&self, raw_text: &str) -> Result<Submission> {
        let question = raw_text.trim();
        if question.is_empty() {
            tracing::trace!("Ignoring empty question");
            return Ok(Submission::Ignored);
        }

        let (question_message, epoch) = {
            let mut transcript = self.transcript.lock().await;
            let message = transcript.append(Sender::User, question.to_string());
            (message, transcript.epoch)
        };
        {
            // Keep anything typed after this question was taken
            let mut draft = self.draft.lock().await;
            if draft.trim() == question {
                draft.clear();
            }
        }

        tracing::debug!(message_id = question_message.id, "Question appended");

        let reply = self.backend.post_chat_question(question).await;

        let mut transcript = self.transcript.lock().await;
        if transcript.epoch != epoch {
            tracing::debug!(
                message_id = question_message.id,
                "Conversation was reset; dropping reply"
            );
            return Ok(Submission::Discarded {
                question: question_message,
            });
        }

        let answer = match reply {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(
                    message_id = question_message.id,
                    "Chat request failed: {}",
                    e
                );
                // Recorded under the transcript lock so a concurrent reset
                // cannot interleave
                *self.last_error.lock().await = Some(e.to_string());
                return Err(e.into());
            }
        };

        let answer_message = transcript.append(Sender::Ai, answer);
        Ok(Submission::Answered {
            question: question_message,
            answer: answer_message,
        })
    }

    /// Snapshot of the transcript in append order
    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.transcript.lock().await.messages.clone()
    }

    pub async fn len(&self) -> usize {
        self.transcript.lock().await.messages.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Most recent chat failure, kept for diagnostics
    pub async fn last_error(&self) -> Option<String> {
        self.last_error.lock().await.clone()
    }

    /// Start a fresh session: empty transcript, empty draft, no error.
    /// Replies still in flight are dropped when they arrive.
    pub async fn reset(&self) {
        {
            let mut transcript = self.transcript.lock().await;
            transcript.messages.clear();
            transcript.next_id = 0;
            transcript.epoch += 1;
        }
        self.draft.lock().await.clear();
        *self.last_error.lock().await = None;
    }
}
