pub mod check;
pub mod config;
pub mod predict;
pub mod search;

use std::fs;
use std::path::Path;

use anyhow::Context;
use restock_core::config::{AppConfig, LoadOptions};
use restock_core::{CatalogUpload, DomainError, SubstitutionEngine};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_INPUT: u8 = 3;
pub const EXIT_VALIDATION: u8 = 4;
pub const EXIT_NOT_FOUND: u8 = 5;

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

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        Self::success_with_data(command, message, None)
    }

    pub fn success_with_data(
        command: &str,
        message: impl Into<String>,
        data: Option<serde_json::Value>,
    ) -> Self {
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

    pub(crate) fn from_domain_error(command: &str, error: DomainError) -> Self {
        match error {
            DomainError::Validation(_) => {
                Self::failure(command, "catalog_validation", error.to_string(), EXIT_VALIDATION)
            }
            DomainError::ProductNotFound(_) | DomainError::CatalogNotLoaded => {
                Self::failure(command, "not_found", error.to_string(), EXIT_NOT_FOUND)
            }
        }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not read `{}`", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("could not parse `{}`", path.display()))
}

/// Builds an engine from the effective config and loads the catalog file
/// into it, mapping each failure to its command outcome.
pub(crate) fn load_engine(command: &str, catalog: &Path) -> Result<SubstitutionEngine, CommandResult> {
    let config = AppConfig::load(LoadOptions::default()).map_err(|error| {
        CommandResult::failure(
            command,
            "config_validation",
            format!("configuration issue: {error}"),
            EXIT_CONFIG,
        )
    })?;

    let upload: CatalogUpload = read_json(catalog).map_err(|error| {
        CommandResult::failure(command, "input", format!("{error:#}"), EXIT_INPUT)
    })?;

    let engine = SubstitutionEngine::with_settings(config.engine.settings());
    engine
        .load(upload.into_products())
        .map_err(|error| CommandResult::from_domain_error(command, error))?;
    Ok(engine)
}

#[cfg(test)]
mod tests {
    use restock_core::{DomainError, ProductId};
    use serde_json::Value;

    use super::{CommandResult, EXIT_NOT_FOUND};

    #[test]
    fn not_found_maps_to_exit_code_and_class() {
        let result =
            CommandResult::from_domain_error("predict", DomainError::ProductNotFound(ProductId(3)));
        assert_eq!(result.exit_code, EXIT_NOT_FOUND);

        let payload: Value = serde_json::from_str(&result.output).expect("json");
        assert_eq!(payload["error_class"], "not_found");
        assert!(payload.get("data").is_none());
    }
}
