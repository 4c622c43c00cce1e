use crate::commands::{build_runtime, load_config, open_pool, CommandResult, StepError};
use shopwise_db::{migrations, CatalogSeed, SeedResult};

pub fn run() -> CommandResult {
    let config = match load_config("seed") {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let runtime = match build_runtime("seed") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let pool = open_pool(&config).await?;

        migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), 5u8))?;

        let seeded = CatalogSeed::load(&pool)
            .await
            .map_err(|error| ("seed_execution", error.to_string(), 5u8))?;

        let verification = CatalogSeed::verify(&pool)
            .await
            .map_err(|error| ("seed_verification", error.to_string(), 6u8))?;

        let failed_checks = verification
            .checks
            .iter()
            .filter_map(|(category, present)| (!present).then_some(*category))
            .collect::<Vec<_>>();

        pool.close().await;

        if verification.all_present {
            Ok::<SeedResult, StepError>(seeded)
        } else {
            Err(("seed_verification", verification_message(&failed_checks), 6u8))
        }
    });

    match result {
        Ok(seeded) => CommandResult::success("seed", summary(&seeded)),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
    }
}

fn summary(seeded: &SeedResult) -> String {
    if seeded.inserted == 0 {
        format!("catalog already populated ({} products); nothing inserted", seeded.skipped_existing)
    } else {
        format!("loaded {} catalog products", seeded.inserted)
    }
}

fn verification_message(failed: &[&str]) -> String {
    if failed.is_empty() {
        "some catalog departments failed to load".to_string()
    } else {
        format!("catalog verification failed for departments: {}", failed.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use shopwise_db::SeedResult;

    use super::{summary, verification_message};

    #[test]
    fn verification_message_names_failed_departments() {
        assert_eq!(
            verification_message(&["Books", "Clothing"]),
            "catalog verification failed for departments: Books, Clothing"
        );
    }

    #[test]
    fn verification_message_falls_back_to_generic_when_no_labels() {
        assert_eq!(verification_message(&[]), "some catalog departments failed to load");
    }

    #[test]
    fn summary_distinguishes_fresh_and_existing_catalogs() {
        assert_eq!(
            summary(&SeedResult { inserted: 82, skipped_existing: 0 }),
            "loaded 82 catalog products"
        );
        assert_eq!(
            summary(&SeedResult { inserted: 0, skipped_existing: 82 }),
            "catalog already populated (82 products); nothing inserted"
        );
    }
}
