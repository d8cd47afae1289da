mod common;

use common::{backend, wait_until, RecordingSink, ScriptedBackend};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tutor_client::{ApiError, TutorBackend};
use tutor_types::Topic;
use tutor_workflow::{GenerationOutcome, Submission, TopicSession, WorkflowError};

#[tokio::test]
async fn test_open_fetches_topic() {
    let backend = backend(ScriptedBackend::new());
    let sink = Arc::new(RecordingSink::default());

    let session = TopicSession::open(backend.clone(), sink.clone(), 2).await.unwrap();

    assert_eq!(session.topic(), &Topic::new(2, "Education"));
    assert!(session.conversation().is_empty().await);
    assert!(!session.documents().is_blocking());
}

#[tokio::test]
async fn test_open_unknown_topic() {
    let backend = backend(ScriptedBackend::new());
    let sink = Arc::new(RecordingSink::default());

    let result = TopicSession::open(backend.clone(), sink.clone(), 99).await;

    assert!(matches!(
        result,
        Err(WorkflowError::Api(ApiError::TopicNotFound(99)))
    ));
}

#[tokio::test]
async fn test_document_uses_topic_name() {
    let backend = backend(ScriptedBackend::new());
    let sink = Arc::new(RecordingSink::default());
    let session = TopicSession::open(backend.clone(), sink.clone(), 3).await.unwrap();

    let outcome = session.create_document().await;

    assert!(matches!(
        outcome,
        GenerationOutcome::Delivered { ref file_name, .. } if file_name == "KTP_Environment.pdf"
    ));
    assert_eq!(sink.delivered()[0].bytes, b"%PDF Environment".to_vec());
}

#[tokio::test]
async fn test_switch_topic_resets_view() {
    let backend = backend(ScriptedBackend::new());
    let sink = Arc::new(RecordingSink::default());
    let mut session = TopicSession::open(backend.clone(), sink.clone(), 1).await.unwrap();

    session.ask("What is AI?").await.unwrap();
    assert_eq!(session.conversation().len().await, 2);

    session.switch_topic(2).await.unwrap();

    assert_eq!(session.topic().name, "Education");
    assert!(session.conversation().is_empty().await);
    assert_eq!(backend.topic_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_reentering_same_topic_skips_fetch() {
    let backend = backend(ScriptedBackend::new());
    let sink = Arc::new(RecordingSink::default());
    let mut session = TopicSession::open(backend.clone(), sink.clone(), 1).await.unwrap();

    session.ask("Hello").await.unwrap();
    session.switch_topic(1).await.unwrap();

    assert!(session.conversation().is_empty().await);
    assert_eq!(backend.topic_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failed_switch_keeps_current_view() {
    let backend = backend(ScriptedBackend::new());
    let sink = Arc::new(RecordingSink::default());
    let mut session = TopicSession::open(backend.clone(), sink.clone(), 1).await.unwrap();
    session.ask("Hello").await.unwrap();

    assert!(session.switch_topic(42).await.is_err());

    assert_eq!(session.topic().name, "Technology");
    assert_eq!(session.conversation().len().await, 2);
}

#[tokio::test]
async fn test_in_flight_reply_dropped_after_switch() {
    let backend = backend(ScriptedBackend::new().gated());
    let sink = Arc::new(RecordingSink::default());
    let mut session = TopicSession::open(backend.clone(), sink.clone(), 1).await.unwrap();

    let old_conversation = session.conversation().clone();
    let pending = tokio::spawn(async move { old_conversation.submit_question("Slow").await });
    wait_until(|| backend.chat_calls() == 1).await;

    session.switch_topic(2).await.unwrap();
    backend.release(1);

    assert!(matches!(pending.await.unwrap().unwrap(), Submission::Discarded { .. }));
    assert!(session.conversation().is_empty().await);
}

#[tokio::test]
async fn test_logout_clears_token() {
    let backend = backend(ScriptedBackend::new());
    let sink = Arc::new(RecordingSink::default());
    let session = TopicSession::open(backend.clone(), sink.clone(), 1).await.unwrap();
    assert!(backend.session().is_authenticated());

    session.logout().await.unwrap();

    assert!(backend.session().get_token().is_none());
}
