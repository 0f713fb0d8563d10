use std::collections::HashSet;

use petworld_db::repositories::{ProductRepository, SqlProductRepository};
use petworld_db::{connect_with_settings, migrations, CatalogSeed};

type SeedContractTestResult<T = ()> = Result<T, String>;

macro_rules! require {
    ($cond:expr) => {
        if !$cond {
            return Err(format!("assertion failed: `{}`", stringify!($cond)));
        }
    };
    ($cond:expr, $($arg:tt)*) => {
        if !$cond {
            return Err(format!($($arg)*));
        }
    };
}

macro_rules! require_eq {
    ($left:expr, $right:expr) => {
        if $left != $right {
            return Err(format!(
                "assertion failed: `left == right` (`{:?}` != `{:?}`)",
                $left,
                $right
            ));
        }
    };
}

#[test]
fn seed_catalog_names_are_unique() -> SeedContractTestResult {
    let mut seen = HashSet::new();
    for product in CatalogSeed::PRODUCTS {
        require!(seen.insert(product.name), "duplicate seed product `{}`", product.name);
    }
    Ok(())
}

#[test]
fn seed_catalog_covers_every_pet_category() -> SeedContractTestResult {
    let categories: HashSet<&str> =
        CatalogSeed::PRODUCTS.iter().map(|product| product.category).collect();
    for expected in [
        "Karma dla psów",
        "Karma dla kotów",
        "Akwarystyka",
        "Akcesoria dla kotów",
        "Zabawki dla psów",
        "Gryzonie",
        "Akcesoria dla psów",
    ] {
        require!(categories.contains(expected), "missing category `{expected}`");
    }
    Ok(())
}

#[tokio::test]
async fn seeded_catalog_round_trips_through_repository() -> SeedContractTestResult {
    let pool = connect_with_settings("sqlite::memory:", 1, 30)
        .await
        .map_err(|error| format!("connect: {error}"))?;
    migrations::run_pending(&pool).await.map_err(|error| format!("migrate: {error}"))?;
    CatalogSeed::load(&pool).await.map_err(|error| format!("seed: {error}"))?;

    let products = SqlProductRepository::new(pool.clone())
        .list_all()
        .await
        .map_err(|error| format!("list: {error}"))?;

    require_eq!(products.len(), CatalogSeed::PRODUCTS.len());
    for (stored, seeded) in products.iter().zip(CatalogSeed::PRODUCTS) {
        require_eq!(stored.name.as_str(), seeded.name);
        require_eq!(stored.category.as_str(), seeded.category);
        require_eq!(stored.description.as_str(), seeded.description);
        require_eq!(stored.price.to_string(), seeded.price.to_string());
    }

    pool.close().await;
    Ok(())
}
