//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod analytics;
pub mod app;
pub mod database;
pub mod logging;
pub mod worker;

use serde::{Deserialize, Serialize};

pub use self::analytics::AnalyticsConfig;
pub use self::app::{CorsConfig, ServerConfig};
pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::worker::WorkerConfig;

use crate::error::AppError;

/// Prefix for environment variable overrides (`NEWSROOM_DATABASE__URL`).
const ENV_PREFIX: &str = "NEWSROOM";

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (base file + environment overlay + env vars).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Analytics engine settings.
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    /// Background worker settings.
    #[serde(default)]
    pub worker: WorkerConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// `path` is the base file (extension optional). If `env` is given, a
    /// sibling `{env}.toml` in the same directory is layered on top.
    /// Environment variables prefixed with `NEWSROOM_` win over both.
    pub fn load(path: &str, env: Option<&str>) -> Result<Self, AppError> {
        let mut builder =
            config::Config::builder().add_source(config::File::with_name(path).required(true));

        if let Some(env) = env {
            let overlay = std::path::Path::new(path)
                .parent()
                .map(|dir| dir.join(env))
                .unwrap_or_else(|| std::path::PathBuf::from(env));
            builder = builder.add_source(
                config::File::with_name(&overlay.to_string_lossy()).required(false),
            );
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make the engine misbehave.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.database.url.trim().is_empty() {
            return Err(AppError::configuration("database.url must not be empty"));
        }
        if self.database.max_connections == 0 {
            return Err(AppError::configuration(
                "database.max_connections must be > 0",
            ));
        }
        self.analytics.validate()?;
        Ok(())
    }
}
