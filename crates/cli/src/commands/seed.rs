use petworld_db::{CatalogSeed, SeedResult};

use crate::commands::{open_migrated_pool, prepare, CommandResult, StepError, EXIT_SEED};

pub fn run() -> CommandResult {
    let (config, runtime) = match prepare("seed") {
        Ok(prepared) => prepared,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let pool = open_migrated_pool(&config).await?;

        let seed_result = CatalogSeed::load(&pool)
            .await
            .map_err(|error| ("seed_execution", error.to_string(), EXIT_SEED))?;

        let verification = CatalogSeed::verify(&pool)
            .await
            .map_err(|error| ("seed_verification", error.to_string(), EXIT_SEED))?;

        let failed_checks = verification
            .checks
            .iter()
            .filter_map(|(check, passed)| (!passed).then_some(*check))
            .collect::<Vec<_>>();

        pool.close().await;
        if verification.all_present {
            Ok::<SeedResult, StepError>(seed_result)
        } else {
            Err(("seed_verification", verification_message(&failed_checks), EXIT_SEED))
        }
    });

    match result {
        Ok(seed_result) => CommandResult::success("seed", success_message(&seed_result)),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
    }
}

fn success_message(seed_result: &SeedResult) -> String {
    if seed_result.already_seeded {
        format!(
            "catalog already present; {} starter products verified",
            CatalogSeed::PRODUCTS.len()
        )
    } else {
        format!("loaded {} starter products", seed_result.products_inserted)
    }
}

fn verification_message(failed_checks: &[&str]) -> String {
    if failed_checks.is_empty() {
        "Some catalog products failed to load".to_string()
    } else {
        format!("Catalog verification failed for products: {}", failed_checks.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use petworld_db::SeedResult;

    use super::{success_message, verification_message};

    #[test]
    fn verification_error_message_targets_failed_checks() {
        let message = verification_message(&["Tetra AquaSafe 500ml", "Kong Classic Large"]);

        assert_eq!(
            message,
            "Catalog verification failed for products: Tetra AquaSafe 500ml, Kong Classic Large"
        );
    }

    #[test]
    fn verification_error_message_falls_back_to_generic_when_no_labels() {
        assert_eq!(verification_message(&[]), "Some catalog products failed to load");
    }

    #[test]
    fn success_message_distinguishes_fresh_and_existing_catalogs() {
        assert_eq!(
            success_message(&SeedResult { products_inserted: 10, already_seeded: false }),
            "loaded 10 starter products"
        );
        assert_eq!(
            success_message(&SeedResult { products_inserted: 0, already_seeded: true }),
            "catalog already present; 10 starter products verified"
        );
    }
}
