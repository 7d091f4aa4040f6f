use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use restock_core::config::{AppConfig, LoadOptions};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let fields = [
        (
            "server.bind_address",
            config.server.bind_address.clone(),
            &["RESTOCK_SERVER_BIND_ADDRESS"][..],
        ),
        ("server.port", config.server.port.to_string(), &["RESTOCK_SERVER_PORT"][..]),
        (
            "server.graceful_shutdown_secs",
            config.server.graceful_shutdown_secs.to_string(),
            &["RESTOCK_SERVER_GRACEFUL_SHUTDOWN_SECS"][..],
        ),
        (
            "server.cors_allowed_origins",
            config.server.cors_allowed_origins.join(","),
            &["RESTOCK_SERVER_CORS_ALLOWED_ORIGINS"][..],
        ),
        (
            "engine.temperature",
            config.engine.temperature.to_string(),
            &["RESTOCK_ENGINE_TEMPERATURE"][..],
        ),
        (
            "engine.cross_family_multiplier",
            config.engine.cross_family_multiplier.to_string(),
            &["RESTOCK_ENGINE_CROSS_FAMILY_MULTIPLIER"][..],
        ),
        (
            "engine.search_limit",
            config.engine.search_limit.to_string(),
            &["RESTOCK_ENGINE_SEARCH_LIMIT"][..],
        ),
        (
            "logging.level",
            config.logging.level.clone(),
            &["RESTOCK_LOGGING_LEVEL", "RESTOCK_LOG_LEVEL"][..],
        ),
        (
            "logging.format",
            format!("{:?}", config.logging.format),
            &["RESTOCK_LOGGING_FORMAT", "RESTOCK_LOG_FORMAT"][..],
        ),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for (key_path, value, env_keys) in fields {
        let source =
            field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref());
        lines.push(render_line(key_path, &value, source));
    }

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("restock.toml"), PathBuf::from("config/restock.toml")]
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
