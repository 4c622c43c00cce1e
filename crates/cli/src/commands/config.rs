use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use shopwise_core::config::{AppConfig, LogFormat};
use toml::Value;

use crate::commands::{load_config, CommandResult};

struct FieldSpec {
    key_path: &'static str,
    env_keys: &'static [&'static str],
}

pub fn run() -> CommandResult {
    let config = match load_config("config") {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    CommandResult::success("config", render(&config, detect_config_path().as_deref()))
}

pub fn render(config: &AppConfig, config_file_path: Option<&Path>) -> String {
    let config_file_doc = load_config_file_doc(config_file_path);
    let source_of = |field: &FieldSpec| {
        field_source(field.key_path, field.env_keys, config_file_doc.as_ref(), config_file_path)
    };

    let api_key = if config.llm.api_key.is_some() { "<redacted>" } else { "<unset>" };
    let log_format = match config.logging.format {
        LogFormat::Compact => "compact",
        LogFormat::Pretty => "pretty",
        LogFormat::Json => "json",
    };

    let fields: Vec<(FieldSpec, String)> = vec![
        (
            FieldSpec { key_path: "database.url", env_keys: &["SHOPWISE_DATABASE_URL"] },
            config.database.url.clone(),
        ),
        (
            FieldSpec {
                key_path: "database.max_connections",
                env_keys: &["SHOPWISE_DATABASE_MAX_CONNECTIONS"],
            },
            config.database.max_connections.to_string(),
        ),
        (
            FieldSpec {
                key_path: "database.timeout_secs",
                env_keys: &["SHOPWISE_DATABASE_TIMEOUT_SECS"],
            },
            config.database.timeout_secs.to_string(),
        ),
        (
            FieldSpec { key_path: "llm.provider", env_keys: &["SHOPWISE_LLM_PROVIDER"] },
            config.llm.provider.as_str().to_string(),
        ),
        (
            FieldSpec { key_path: "llm.model", env_keys: &["SHOPWISE_LLM_MODEL"] },
            config.llm.model.clone(),
        ),
        (
            FieldSpec { key_path: "llm.base_url", env_keys: &["SHOPWISE_LLM_BASE_URL"] },
            config.llm.effective_base_url().to_string(),
        ),
        (
            FieldSpec {
                key_path: "llm.api_key",
                env_keys: &["SHOPWISE_LLM_API_KEY", "GROQ_API_KEY"],
            },
            api_key.to_string(),
        ),
        (
            FieldSpec { key_path: "llm.timeout_secs", env_keys: &["SHOPWISE_LLM_TIMEOUT_SECS"] },
            config.llm.timeout_secs.to_string(),
        ),
        (
            FieldSpec { key_path: "llm.temperature", env_keys: &["SHOPWISE_LLM_TEMPERATURE"] },
            config.llm.temperature.to_string(),
        ),
        (
            FieldSpec {
                key_path: "chat.history_window",
                env_keys: &["SHOPWISE_CHAT_HISTORY_WINDOW"],
            },
            config.chat.history_window.to_string(),
        ),
        (
            FieldSpec {
                key_path: "server.bind_address",
                env_keys: &["SHOPWISE_SERVER_BIND_ADDRESS"],
            },
            config.server.bind_address.clone(),
        ),
        (
            FieldSpec { key_path: "server.port", env_keys: &["SHOPWISE_SERVER_PORT"] },
            config.server.port.to_string(),
        ),
        (
            FieldSpec {
                key_path: "server.graceful_shutdown_secs",
                env_keys: &["SHOPWISE_SERVER_GRACEFUL_SHUTDOWN_SECS"],
            },
            config.server.graceful_shutdown_secs.to_string(),
        ),
        (
            FieldSpec {
                key_path: "logging.level",
                env_keys: &["SHOPWISE_LOGGING_LEVEL", "SHOPWISE_LOG_LEVEL"],
            },
            config.logging.level.clone(),
        ),
        (
            FieldSpec {
                key_path: "logging.format",
                env_keys: &["SHOPWISE_LOGGING_FORMAT", "SHOPWISE_LOG_FORMAT"],
            },
            log_format.to_string(),
        ),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    lines.extend(
        fields.iter().map(|(field, value)| render_line(field.key_path, value, source_of(field))),
    );
    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("shopwise.toml"), PathBuf::from("config/shopwise.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let raw = fs::read_to_string(path?).ok()?;
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
