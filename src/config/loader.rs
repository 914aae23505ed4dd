use crate::config::config::AppConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::PathBuf;

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from default locations.
    ///
    /// Search order:
    /// 1. development defaults
    /// 2. ./showroom.toml
    /// 3. SHOWROOM_* environment variables
    pub fn load() -> Result<AppConfig, figment::Error> {
        let figment = Figment::from(Serialized::defaults(AppConfig::development()))
            .merge(Toml::file("showroom.toml"))
            .merge(Env::prefixed("SHOWROOM_").split("__"));

        figment.extract()
    }

    /// Load configuration from a specific file
    pub fn load_from(path: PathBuf) -> Result<AppConfig, figment::Error> {
        let figment = Figment::from(Serialized::defaults(AppConfig::development()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("SHOWROOM_").split("__"));

        figment.extract()
    }

    /// Validate configuration
    pub fn validate(config: &AppConfig) -> Result<(), ConfigValidationError> {
        if config.server.port == 0 {
            return Err(ConfigValidationError::InvalidPort);
        }

        if config.database.url.is_empty() {
            return Err(ConfigValidationError::MissingDatabaseUrl);
        }

        if config.generator.url.is_empty() {
            return Err(ConfigValidationError::MissingGeneratorUrl);
        }

        if config.memory.session_timeout_hours <= 0 || config.memory.candidate_window_days <= 0 {
            return Err(ConfigValidationError::InvalidMemoryWindow);
        }

        Ok(())
    }
}

/// Configuration validation errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigValidationError {
    #[error("server port must be greater than 0")]
    InvalidPort,

    #[error("database url is not configured")]
    MissingDatabaseUrl,

    #[error("generator url is not configured")]
    MissingGeneratorUrl,

    #[error("memory windows must be positive")]
    InvalidMemoryWindow,
}
