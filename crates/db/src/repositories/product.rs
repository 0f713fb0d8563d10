use std::str::FromStr;

use rust_decimal::Decimal;
use sqlx::Row;

use petworld_core::domain::product::{Product, ProductId};

use super::{ProductRepository, RepositoryError};
use crate::DbPool;

pub struct SqlProductRepository {
    pool: DbPool,
}

impl SqlProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_product(row: &sqlx::sqlite::SqliteRow) -> Result<Product, RepositoryError> {
    let id: i64 = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let name: String = row.try_get("name").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let category: String =
        row.try_get("category").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let price_str: String =
        row.try_get("price").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let description: String =
        row.try_get("description").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    let price = Decimal::from_str(price_str.trim()).map_err(|e| {
        RepositoryError::Decode(format!("product {id} has invalid price `{price_str}`: {e}"))
    })?;

    Ok(Product { id: ProductId(id), name, category, price, description })
}

#[async_trait::async_trait]
impl ProductRepository for SqlProductRepository {
    async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<sqlx::sqlite::SqliteRow> = sqlx::query(
            "SELECT id, name, category, price, description FROM product ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_product).collect::<Result<Vec<_>, _>>()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::SqlProductRepository;
    use crate::repositories::{ProductRepository, RepositoryError};
    use crate::{connect_with_settings, migrations, CatalogSeed};

    #[tokio::test]
    async fn list_all_returns_seeded_catalog_in_insertion_order() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        CatalogSeed::load(&pool).await.expect("seed");

        let repo = SqlProductRepository::new(pool.clone());
        let products = repo.list_all().await.expect("list products");

        assert_eq!(products.len(), CatalogSeed::PRODUCTS.len());
        assert_eq!(products[0].name, "Royal Canin Adult Dog 15kg");
        assert_eq!(products[0].price, Decimal::new(289, 0));
        assert_eq!(products[9].name, "Vitapol Siano dla królików 1kg");
        assert!(products.windows(2).all(|pair| pair[0].id < pair[1].id));

        pool.close().await;
    }

    #[tokio::test]
    async fn list_all_is_stable_without_mutation() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        CatalogSeed::load(&pool).await.expect("seed");

        let repo = SqlProductRepository::new(pool.clone());
        let first = repo.list_all().await.expect("first listing");
        let second = repo.list_all().await.expect("second listing");

        assert_eq!(first, second);
        pool.close().await;
    }

    #[tokio::test]
    async fn invalid_price_surfaces_decode_error() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        sqlx::query(
            "INSERT INTO product (name, category, price, description)
             VALUES ('Broken', 'Test', 'not-a-number', '')",
        )
        .execute(&pool)
        .await
        .expect("insert broken product");

        let repo = SqlProductRepository::new(pool.clone());
        let result = repo.list_all().await;

        assert!(matches!(result, Err(RepositoryError::Decode(ref message)) if message.contains("not-a-number")));
        pool.close().await;
    }
}
