use petworld_server::{bootstrap_with_config, BootstrapError, ChatError};

use crate::commands::{
    prepare, CommandResult, StepError, EXIT_CONFIG, EXIT_DATABASE, EXIT_GENERATION,
    EXIT_INVALID_INPUT, EXIT_MIGRATION, EXIT_RUNTIME, EXIT_SEED,
};

pub fn run(question: &str) -> CommandResult {
    let question = question.trim();
    if question.is_empty() {
        return CommandResult::failure(
            "ask",
            "invalid_input",
            "question must not be blank",
            EXIT_INVALID_INPUT,
        );
    }

    let (config, runtime) = match prepare("ask") {
        Ok(prepared) => prepared,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let app = bootstrap_with_config(config).await.map_err(bootstrap_failure)?;
        let outcome = app.chat.ask(question).await.map_err(chat_failure);
        app.db_pool.close().await;
        outcome
    });

    match result {
        Ok(response) => CommandResult::success_with_data("ask", response.answer.clone(), &response),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("ask", error_class, message, exit_code)
        }
    }
}

fn bootstrap_failure(error: BootstrapError) -> StepError {
    let (error_class, exit_code) = match &error {
        BootstrapError::DatabaseConnect(_) => ("db_connectivity", EXIT_DATABASE),
        BootstrapError::Migration(_) => ("migration", EXIT_MIGRATION),
        BootstrapError::Seed(_) => ("seed_execution", EXIT_SEED),
        BootstrapError::Llm(_) => ("llm_configuration", EXIT_CONFIG),
        BootstrapError::Templates(_) => ("runtime_init", EXIT_RUNTIME),
    };
    (error_class, error.to_string(), exit_code)
}

fn chat_failure(error: ChatError) -> StepError {
    let (error_class, exit_code) = match &error {
        ChatError::Refinement(_) => ("generation", EXIT_GENERATION),
        ChatError::Domain(_) => ("internal", EXIT_RUNTIME),
        ChatError::Repository(_) => ("persistence", EXIT_DATABASE),
    };
    (error_class, error.to_string(), exit_code)
}
