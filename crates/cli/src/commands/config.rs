use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use petworld_core::config::{AppConfig, LoadOptions};
use secrecy::ExposeSecret;
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let api_key = config
        .llm
        .api_key
        .as_ref()
        .map(|key| redact_key(key.expose_secret()))
        .unwrap_or_else(|| "<unset>".to_string());

    let fields = vec![
        field("database.url", config.database.url.clone(), &["PETWORLD_DATABASE_URL"]),
        field(
            "database.max_connections",
            config.database.max_connections.to_string(),
            &["PETWORLD_DATABASE_MAX_CONNECTIONS"],
        ),
        field(
            "database.timeout_secs",
            config.database.timeout_secs.to_string(),
            &["PETWORLD_DATABASE_TIMEOUT_SECS"],
        ),
        field("llm.provider", format!("{:?}", config.llm.provider), &["PETWORLD_LLM_PROVIDER"]),
        field("llm.model", config.llm.model.clone(), &["PETWORLD_LLM_MODEL"]),
        field("llm.base_url", config.llm.effective_base_url(), &["PETWORLD_LLM_BASE_URL"]),
        field("llm.api_key", api_key, &["PETWORLD_LLM_API_KEY", "OPENAI_API_KEY"]),
        field("llm.timeout_secs", config.llm.timeout_secs.to_string(), &["PETWORLD_LLM_TIMEOUT_SECS"]),
        field(
            "refinement.max_iterations",
            config.refinement.max_iterations.to_string(),
            &["PETWORLD_REFINEMENT_MAX_ITERATIONS"],
        ),
        field(
            "server.bind_address",
            config.server.bind_address.clone(),
            &["PETWORLD_SERVER_BIND_ADDRESS"],
        ),
        field("server.port", config.server.port.to_string(), &["PETWORLD_SERVER_PORT"]),
        field(
            "server.health_check_port",
            config.server.health_check_port.to_string(),
            &["PETWORLD_SERVER_HEALTH_CHECK_PORT"],
        ),
        field(
            "logging.level",
            config.logging.level.clone(),
            &["PETWORLD_LOGGING_LEVEL", "PETWORLD_LOG_LEVEL"],
        ),
        field(
            "logging.format",
            format!("{:?}", config.logging.format),
            &["PETWORLD_LOGGING_FORMAT", "PETWORLD_LOG_FORMAT"],
        ),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for (key, value, env_keys) in fields {
        let source =
            field_source(key, env_keys, config_file_doc.as_ref(), config_file_path.as_deref());
        lines.push(render_line(key, &value, source));
    }

    lines.join("\n")
}

type Field = (&'static str, String, &'static [&'static str]);

fn field(key: &'static str, value: String, env_keys: &'static [&'static str]) -> Field {
    (key, value, env_keys)
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("petworld.toml"), PathBuf::from("config/petworld.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

fn redact_key(key: &str) -> String {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if let Some((prefix, _)) = trimmed.split_once('-') {
        return format!("{prefix}-***");
    }

    "<redacted>".to_string()
}
