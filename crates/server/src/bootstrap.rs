use std::sync::Arc;

use restock_core::config::{AppConfig, ConfigError, LoadOptions};
use restock_core::SubstitutionEngine;
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub engine: Arc<SubstitutionEngine>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    Ok(bootstrap_with_config(config))
}

pub fn bootstrap_with_config(config: AppConfig) -> Application {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let settings = config.engine.settings();
    let engine = Arc::new(SubstitutionEngine::with_settings(settings));
    info!(
        event_name = "system.bootstrap.engine_ready",
        correlation_id = "bootstrap",
        temperature = settings.temperature,
        cross_family_multiplier = settings.cross_family_multiplier,
        "substitution engine initialized with an empty catalog"
    );

    Application { config, engine }
}

#[cfg(test)]
mod tests {
    use restock_core::config::{ConfigOverrides, LoadOptions};

    use crate::bootstrap::bootstrap;

    fn options(overrides: ConfigOverrides) -> LoadOptions {
        LoadOptions {
            config_path: Some(std::env::temp_dir().join("restock-bootstrap-absent.toml")),
            overrides,
            ..LoadOptions::default()
        }
    }

    #[test]
    fn bootstrap_fails_fast_on_invalid_engine_settings() {
        let result = bootstrap(options(ConfigOverrides {
            temperature: Some(-1.0),
            ..ConfigOverrides::default()
        }));

        let message = match result {
            Ok(_) => panic!("negative temperature should be rejected"),
            Err(error) => error.to_string(),
        };
        assert!(message.contains("engine.temperature"));
    }

    #[test]
    fn bootstrap_starts_with_empty_catalog() {
        let app = bootstrap(options(ConfigOverrides {
            port: Some(18_080),
            ..ConfigOverrides::default()
        }))
        .expect("bootstrap should succeed with valid overrides");

        assert_eq!(app.config.server.port, 18_080);
        assert!(!app.engine.status().loaded);
    }
}
