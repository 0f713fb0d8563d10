use async_trait::async_trait;
use thiserror::Error;

use petworld_core::domain::conversation::{ConversationRecord, NewConversation};
use petworld_core::domain::product::Product;

pub mod conversation;
pub mod memory;
pub mod product;

pub use conversation::SqlConversationRepository;
pub use memory::{InMemoryConversationRepository, InMemoryProductRepository};
pub use product::SqlProductRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

/// Read-only view of the product catalog.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Every product, in catalog (insertion) order.
    async fn list_all(&self) -> Result<Vec<Product>, RepositoryError>;
}

/// Append-only store of answered questions.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    async fn append(
        &self,
        conversation: NewConversation,
    ) -> Result<ConversationRecord, RepositoryError>;

    /// Every record, newest first.
    async fn list_all(&self) -> Result<Vec<ConversationRecord>, RepositoryError>;
}
