use std::env;
use std::sync::{Mutex, OnceLock};

use petworld_cli::commands::{ask, doctor, history, migrate, seed};
use serde_json::Value;
use tempfile::TempDir;

#[test]
fn migrate_returns_success_with_valid_env() {
    let dir = TempDir::new().expect("temp dir");
    with_env(&offline_env(&dir), || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 0, "expected successful migrate run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "ok");
    });
}

#[test]
fn migrate_returns_config_failure_without_api_key() {
    with_env(&[("PETWORLD_DATABASE_URL", "sqlite::memory:".to_string())], || {
        let result = migrate::run();
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
        assert!(payload["message"].as_str().unwrap_or_default().contains("llm.api_key"));
    });
}

#[test]
fn seed_is_idempotent_across_runs() {
    let dir = TempDir::new().expect("temp dir");
    with_env(&offline_env(&dir), || {
        let first = seed::run();
        assert_eq!(first.exit_code, 0, "expected first seed invocation success");
        let first_payload = parse_payload(&first.output);
        assert_eq!(first_payload["status"], "ok");
        assert_eq!(first_payload["message"], "loaded 10 starter products");

        let second = seed::run();
        assert_eq!(second.exit_code, 0, "expected second seed invocation success");
        let second_payload = parse_payload(&second.output);
        assert_eq!(second_payload["status"], "ok");
        assert_eq!(
            second_payload["message"],
            "catalog already present; 10 starter products verified"
        );
    });
}

#[test]
fn history_is_empty_on_a_fresh_database() {
    let dir = TempDir::new().expect("temp dir");
    with_env(&offline_env(&dir), || {
        let result = history::run();
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "history");
        assert_eq!(payload["message"], "0 conversations recorded");
        assert_eq!(payload["data"], Value::Array(Vec::new()));
    });
}

#[test]
fn ask_reports_generation_failure_and_records_nothing() {
    let dir = TempDir::new().expect("temp dir");
    let mut vars = offline_env(&dir);
    // nothing listens on the discard port, so the writer call fails fast
    vars.push(("PETWORLD_LLM_BASE_URL", "http://127.0.0.1:9/v1".to_string()));
    vars.push(("PETWORLD_LLM_TIMEOUT_SECS", "5".to_string()));

    with_env(&vars, || {
        let result = ask::run("Co polecasz dla kota?");
        assert_eq!(result.exit_code, 7, "expected generation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "ask");
        assert_eq!(payload["error_class"], "generation");

        let history = parse_payload(&history::run().output);
        assert_eq!(history["data"], Value::Array(Vec::new()));
    });
}

#[test]
fn doctor_passes_once_catalog_is_seeded() {
    let dir = TempDir::new().expect("temp dir");
    with_env(&offline_env(&dir), || {
        let before: Value = serde_json::from_str(&doctor::run(true)).expect("doctor json");
        assert_eq!(before["overall_status"], "fail", "unmigrated database is not ready");

        assert_eq!(seed::run().exit_code, 0);

        let after: Value = serde_json::from_str(&doctor::run(true)).expect("doctor json");
        assert_eq!(after["overall_status"], "pass");
        let names: Vec<&str> = after["checks"]
            .as_array()
            .expect("checks")
            .iter()
            .filter_map(|check| check["name"].as_str())
            .collect();
        assert_eq!(
            names,
            vec!["config_validation", "llm_settings", "database_connectivity", "catalog_readiness"]
        );
    });
}

fn offline_env(dir: &TempDir) -> Vec<(&'static str, String)> {
    let database_path = dir.path().join("petworld.db");
    vec![
        ("PETWORLD_DATABASE_URL", format!("sqlite://{}?mode=rwc", database_path.display())),
        ("PETWORLD_LLM_PROVIDER", "ollama".to_string()),
    ]
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, String)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard = ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    let keys = [
        "PETWORLD_DATABASE_URL",
        "PETWORLD_DATABASE_MAX_CONNECTIONS",
        "PETWORLD_DATABASE_TIMEOUT_SECS",
        "PETWORLD_LLM_PROVIDER",
        "PETWORLD_LLM_API_KEY",
        "PETWORLD_LLM_BASE_URL",
        "PETWORLD_LLM_MODEL",
        "PETWORLD_LLM_TIMEOUT_SECS",
        "PETWORLD_REFINEMENT_MAX_ITERATIONS",
        "PETWORLD_SERVER_BIND_ADDRESS",
        "PETWORLD_SERVER_PORT",
        "PETWORLD_SERVER_HEALTH_CHECK_PORT",
        "PETWORLD_SERVER_GRACEFUL_SHUTDOWN_SECS",
        "PETWORLD_LOGGING_LEVEL",
        "PETWORLD_LOGGING_FORMAT",
        "PETWORLD_LOG_LEVEL",
        "PETWORLD_LOG_FORMAT",
        "OPENAI_API_KEY",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
