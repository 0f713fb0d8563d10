pub mod ask;
pub mod config;
pub mod doctor;
pub mod history;
pub mod migrate;
pub mod seed;

use petworld_core::config::{AppConfig, LoadOptions};
use petworld_db::{connect_with_settings, migrations, DbPool};
use serde::Serialize;
use tokio::runtime::Runtime;

pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_RUNTIME: u8 = 3;
pub const EXIT_DATABASE: u8 = 4;
pub const EXIT_MIGRATION: u8 = 5;
pub const EXIT_SEED: u8 = 6;
pub const EXIT_GENERATION: u8 = 7;
pub const EXIT_INVALID_INPUT: u8 = 8;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
}

/// Failure raised inside a command body: `(error_class, message, exit_code)`.
pub(crate) type StepError = (&'static str, String, u8);

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        Self::ok_payload(command, message, None)
    }

    /// Success carrying `data`; a payload that cannot be encoded is reported as a failure.
    pub fn success_with_data<T: Serialize + ?Sized>(
        command: &str,
        message: impl Into<String>,
        data: &T,
    ) -> Self {
        match serde_json::to_value(data) {
            Ok(value) => Self::ok_payload(command, message, Some(value)),
            Err(error) => Self::failure(
                command,
                "serialization",
                format!("failed to encode command data: {error}"),
                EXIT_RUNTIME,
            ),
        }
    }

    fn ok_payload(command: &str, message: impl Into<String>, data: Option<serde_json::Value>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }
}

/// Load validated config and a current-thread runtime, or the failure to report.
pub(crate) fn prepare(command: &str) -> Result<(AppConfig, Runtime), CommandResult> {
    let config = AppConfig::load(LoadOptions::default()).map_err(|error| {
        CommandResult::failure(
            command,
            "config_validation",
            format!("configuration issue: {error}"),
            EXIT_CONFIG,
        )
    })?;

    let runtime =
        tokio::runtime::Builder::new_current_thread().enable_all().build().map_err(|error| {
            CommandResult::failure(
                command,
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                EXIT_RUNTIME,
            )
        })?;

    Ok((config, runtime))
}

pub(crate) async fn open_migrated_pool(config: &AppConfig) -> Result<DbPool, StepError> {
    let pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(|error| ("db_connectivity", error.to_string(), EXIT_DATABASE))?;

    migrations::run_pending(&pool)
        .await
        .map_err(|error| ("migration", error.to_string(), EXIT_MIGRATION))?;

    Ok(pool)
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{CommandResult, EXIT_RUNTIME};

    #[test]
    fn success_payload_omits_absent_data() {
        let result = CommandResult::success("migrate", "applied pending migrations");
        let payload: serde_json::Value = serde_json::from_str(&result.output).expect("json");

        assert_eq!(result.exit_code, 0);
        assert_eq!(payload["status"], "ok");
        assert!(payload["error_class"].is_null());
        assert!(payload.get("data").is_none());
    }

    #[test]
    fn failure_payload_carries_error_class_and_code() {
        let result = CommandResult::failure("ask", "generation", "llm transport failure", 7);
        let payload: serde_json::Value = serde_json::from_str(&result.output).expect("json");

        assert_eq!(result.exit_code, 7);
        assert_eq!(payload["command"], "ask");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "generation");
    }

    #[test]
    fn unencodable_data_is_reported_instead_of_dropped() {
        let mut keyed_by_bytes = BTreeMap::new();
        keyed_by_bytes.insert(vec![1_u8, 2], "non-string map keys are rejected by JSON");

        let result =
            CommandResult::success_with_data("history", "1 conversations recorded", &keyed_by_bytes);
        let payload: serde_json::Value = serde_json::from_str(&result.output).expect("json");

        assert_eq!(result.exit_code, EXIT_RUNTIME);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "serialization");
        assert!(payload.get("data").is_none());
    }

    #[test]
    fn encodable_data_is_embedded() {
        let result =
            CommandResult::success_with_data("history", "0 conversations recorded", &Vec::<u8>::new());
        let payload: serde_json::Value = serde_json::from_str(&result.output).expect("json");

        assert_eq!(result.exit_code, 0);
        assert_eq!(payload["data"], serde_json::Value::Array(Vec::new()));
    }
}
