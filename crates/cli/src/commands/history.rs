use petworld_db::repositories::{ConversationRepository, SqlConversationRepository};

use crate::commands::{open_migrated_pool, prepare, CommandResult, EXIT_DATABASE};

pub fn run() -> CommandResult {
    let (config, runtime) = match prepare("history") {
        Ok(prepared) => prepared,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let pool = open_migrated_pool(&config).await?;
        let records = SqlConversationRepository::new(pool.clone())
            .list_all()
            .await
            .map_err(|error| ("persistence", error.to_string(), EXIT_DATABASE));
        pool.close().await;
        records
    });

    match result {
        Ok(records) => {
            let message = format!("{} conversations recorded", records.len());
            CommandResult::success_with_data("history", message, &records)
        }
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("history", error_class, message, exit_code)
        }
    }
}
