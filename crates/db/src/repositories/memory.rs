use tokio::sync::RwLock;

use petworld_core::domain::conversation::{ConversationId, ConversationRecord, NewConversation};
use petworld_core::domain::product::Product;

use super::{ConversationRepository, ProductRepository, RepositoryError};

#[derive(Default)]
pub struct InMemoryProductRepository {
    products: Vec<Product>,
}

impl InMemoryProductRepository {
    pub fn with_products(products: Vec<Product>) -> Self {
        Self { products }
    }
}

#[async_trait::async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.products.clone())
    }
}

#[derive(Default)]
pub struct InMemoryConversationRepository {
    records: RwLock<Vec<ConversationRecord>>,
}

impl InMemoryConversationRepository {
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl ConversationRepository for InMemoryConversationRepository {
    async fn append(
        &self,
        conversation: NewConversation,
    ) -> Result<ConversationRecord, RepositoryError> {
        let mut records = self.records.write().await;
        let next_id = records.iter().map(|record| record.id.0).max().unwrap_or(0) + 1;
        let record = conversation.into_record(ConversationId(next_id));
        records.push(record.clone());
        Ok(record)
    }

    async fn list_all(&self) -> Result<Vec<ConversationRecord>, RepositoryError> {
        let mut records = self.records.read().await.clone();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(records)
    }
}
