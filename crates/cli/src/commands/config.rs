use std::env;
use std::fs;
use std::path::Path;

use cruisemate_core::config::{resolve_config_path, AppConfig, LoadOptions};
use serde::Serialize;
use toml::Value;

use crate::commands::CommandResult;

#[derive(Debug, Serialize)]
struct ConfigField {
    key: &'static str,
    value: String,
    source: String,
}

/// Reports effective configuration values with their source (env > file > default).
pub fn run(options: LoadOptions) -> CommandResult {
    let config_file_path = resolve_config_path(options.config_path.as_deref());
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => return CommandResult::from_error("config", error.into(), None),
    };

    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let field = |key: &'static str, value: String, env_keys: &[&str]| ConfigField {
        key,
        value,
        source: field_source(key, env_keys, config_file_doc.as_ref(), config_file_path.as_deref()),
    };

    let reference_date = config
        .resolver
        .reference_date
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "<today>".to_string());

    let fields = vec![
        field(
            "resolver.reference_date",
            reference_date,
            &["CRUISEMATE_RESOLVER_REFERENCE_DATE"],
        ),
        field(
            "resolver.min_confidence",
            config.resolver.min_confidence.to_string(),
            &["CRUISEMATE_RESOLVER_MIN_CONFIDENCE"],
        ),
        field(
            "logging.level",
            config.logging.level.clone(),
            &["CRUISEMATE_LOGGING_LEVEL", "CRUISEMATE_LOG_LEVEL"],
        ),
        field(
            "logging.format",
            config.logging.format.as_str().to_string(),
            &["CRUISEMATE_LOGGING_FORMAT", "CRUISEMATE_LOG_FORMAT"],
        ),
    ];

    let message = "effective config (source precedence: env > file > default)";
    match serde_json::to_value(&fields) {
        Ok(result) => CommandResult::success_with("config", message, result),
        Err(error) => CommandResult::failure("config", "serialization", error.to_string(), 3),
    }
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
