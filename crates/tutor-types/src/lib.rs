pub mod message;
pub mod topic;
pub mod wire;

pub use message::{clock_timestamp, ChatMessage, MessageId, Sender};
pub use topic::{Topic, TopicId};
pub use wire::{ChatAnswer, ChatQuestion, Credentials, DocumentRequest, LoginResponse};
