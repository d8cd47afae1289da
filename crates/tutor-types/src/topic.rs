use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend identifier of a topic
pub type TopicId = i64;

/// A subject area the learner converses about and generates a KTP for.
///
/// Topics are immutable once fetched; a new id means a new fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: TopicId,
    pub name: String,
}

impl Topic {
    pub fn new(id: TopicId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// File name of the generated teaching document for this topic
    pub fn document_file_name(&self) -> String {
        format!("KTP_{}.pdf", self.name)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (#{})", self.name, self.id)
    }
}
