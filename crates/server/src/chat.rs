//! Question answering: catalog lookup, refinement, persistence.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use petworld_agent::{RefinementEngine, RefinementError};
use petworld_core::domain::conversation::{ConversationId, ConversationRecord, NewConversation};
use petworld_core::errors::{ApplicationError, DomainError};
use petworld_db::repositories::{ConversationRepository, ProductRepository, RepositoryError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatResponse {
    pub id: ConversationId,
    pub answer: String,
    pub iteration_count: u32,
    pub created_at: DateTime<Utc>,
}

impl From<ConversationRecord> for ChatResponse {
    fn from(record: ConversationRecord) -> Self {
        Self {
            id: record.id,
            answer: record.answer,
            iteration_count: record.iteration_count,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error(transparent)]
    Refinement(#[from] RefinementError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<ChatError> for ApplicationError {
    fn from(value: ChatError) -> Self {
        match value {
            ChatError::Refinement(error) => Self::Generation(error.to_string()),
            ChatError::Repository(error) => Self::Persistence(error.to_string()),
            ChatError::Domain(error) => Self::Domain(error),
        }
    }
}

pub struct ChatService {
    products: Arc<dyn ProductRepository>,
    conversations: Arc<dyn ConversationRepository>,
    engine: Arc<RefinementEngine>,
}

impl ChatService {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        conversations: Arc<dyn ConversationRepository>,
        engine: Arc<RefinementEngine>,
    ) -> Self {
        Self { products, conversations, engine }
    }

    /// Answer `question` and record the exchange. Nothing is stored when generation fails.
    pub async fn ask(&self, question: &str) -> Result<ChatResponse, ChatError> {
        let products = self.products.list_all().await?;
        let refinement = match self.engine.refine(question, &products).await {
            Ok(refinement) => refinement,
            Err(error) => {
                error!(
                    event_name = "server.chat.generation_failed",
                    error = %error,
                    "question could not be answered"
                );
                return Err(error.into());
            }
        };

        let max = self.engine.max_iterations();
        if !(1..=max).contains(&refinement.iterations) {
            return Err(DomainError::IterationCountOutOfRange { count: refinement.iterations, max }
                .into());
        }

        let record = self
            .conversations
            .append(NewConversation {
                question: question.to_string(),
                answer: refinement.answer,
                iteration_count: refinement.iterations,
                created_at: Utc::now(),
            })
            .await?;

        info!(
            event_name = "server.chat.answered",
            conversation_id = record.id.0,
            iteration_count = record.iteration_count,
            catalog_size = products.len(),
            "question answered"
        );
        Ok(record.into())
    }

    pub async fn history(&self) -> Result<Vec<ConversationRecord>, ChatError> {
        Ok(self.conversations.list_all().await?)
    }
}
