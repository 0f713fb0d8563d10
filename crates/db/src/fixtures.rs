use tracing::info;

use crate::connection::DbPool;
use crate::repositories::RepositoryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedProduct {
    pub name: &'static str,
    pub category: &'static str,
    /// Decimal price in złoty, stored as text to keep two-digit precision exact.
    pub price: &'static str,
    pub description: &'static str,
}

/// The PetWorld starter catalog.
///
/// Loading is idempotent: when the `product` table already holds rows nothing is written, so
/// restarts and repeated `seed` runs never duplicate the catalog.
pub struct CatalogSeed;

impl CatalogSeed {
    pub const PRODUCTS: &'static [SeedProduct] = &[
        SeedProduct {
            name: "Royal Canin Adult Dog 15kg",
            category: "Karma dla psów",
            price: "289.00",
            description: "Premium karma dla dorosłych psów średnich ras",
        },
        SeedProduct {
            name: "Whiskas Adult Kurczak 7kg",
            category: "Karma dla kotów",
            price: "129.00",
            description: "Sucha karma dla dorosłych kotów z kurczakiem",
        },
        SeedProduct {
            name: "Tetra AquaSafe 500ml",
            category: "Akwarystyka",
            price: "45.00",
            description: "Uzdatniacz wody do akwarium, neutralizuje chlor",
        },
        SeedProduct {
            name: "Trixie Drapak XL 150cm",
            category: "Akcesoria dla kotów",
            price: "399.00",
            description: "Wysoki drapak z platformami i domkiem",
        },
        SeedProduct {
            name: "Kong Classic Large",
            category: "Zabawki dla psów",
            price: "69.00",
            description: "Wytrzymała zabawka do napełniania smakołykami",
        },
        SeedProduct {
            name: "Ferplast Klatka dla chomika",
            category: "Gryzonie",
            price: "189.00",
            description: "Klatka 60x40cm z wyposażeniem",
        },
        SeedProduct {
            name: "Flexi Smycz automatyczna 8m",
            category: "Akcesoria dla psów",
            price: "119.00",
            description: "Smycz zwijana dla psów do 50kg",
        },
        SeedProduct {
            name: "Brit Premium Kitten 8kg",
            category: "Karma dla kotów",
            price: "159.00",
            description: "Karma dla kociąt do 12 miesiąca życia",
        },
        SeedProduct {
            name: "JBL ProFlora CO2 Set",
            category: "Akwarystyka",
            price: "549.00",
            description: "Kompletny zestaw CO2 dla roślin akwariowych",
        },
        SeedProduct {
            name: "Vitapol Siano dla królików 1kg",
            category: "Gryzonie",
            price: "25.00",
            description: "Naturalne siano łąkowe, podstawa diety",
        },
    ];

    /// Insert the starter catalog unless products already exist.
    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM product").fetch_one(pool).await?;
        if existing > 0 {
            info!(
                event_name = "db.seed.skipped",
                existing_products = existing,
                "catalog already seeded"
            );
            return Ok(SeedResult { products_inserted: 0, already_seeded: true });
        }

        let mut tx = pool.begin().await?;
        for product in Self::PRODUCTS {
            sqlx::query(
                "INSERT INTO product (name, category, price, description) VALUES (?, ?, ?, ?)",
            )
            .bind(product.name)
            .bind(product.category)
            .bind(product.price)
            .bind(product.description)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        info!(
            event_name = "db.seed.loaded",
            products_inserted = Self::PRODUCTS.len(),
            "catalog seeded"
        );
        Ok(SeedResult { products_inserted: Self::PRODUCTS.len(), already_seeded: false })
    }

    /// Check that every starter product is present.
    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::with_capacity(Self::PRODUCTS.len());

        for product in Self::PRODUCTS {
            let present: i64 = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM product WHERE name = ?1 AND category = ?2)",
            )
            .bind(product.name)
            .bind(product.category)
            .fetch_one(pool)
            .await?;
            checks.push((product.name, present == 1));
        }

        let all_present = checks.iter().all(|(_, exists)| *exists);
        Ok(VerificationResult { all_present, checks })
    }
}

#[derive(Debug)]
pub struct SeedResult {
    pub products_inserted: usize,
    pub already_seeded: bool,
}

#[derive(Debug)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}
