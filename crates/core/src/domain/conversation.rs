use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConversationId(pub i64);

/// A conversation that has been refined but not yet persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewConversation {
    pub question: String,
    pub answer: String,
    pub iteration_count: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub id: ConversationId,
    pub created_at: DateTime<Utc>,
    pub question: String,
    pub answer: String,
    pub iteration_count: u32,
}

impl NewConversation {
    pub fn into_record(self, id: ConversationId) -> ConversationRecord {
        ConversationRecord {
            id,
            created_at: self.created_at,
            question: self.question,
            answer: self.answer,
            iteration_count: self.iteration_count,
        }
    }
}
