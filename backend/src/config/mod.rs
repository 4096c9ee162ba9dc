//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `SYMPOSIUM` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use symposium::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod chat;
mod database;
mod error;
mod server;
mod session;

pub use chat::ChatConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};
pub use session::{SameSite, SessionConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults; `database` may be omitted entirely to run on
/// in-memory storage.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL connection; `None` selects in-memory storage
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub chat: ChatConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `SYMPOSIUM` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// - `SYMPOSIUM__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `SYMPOSIUM__DATABASE__URL=...` -> `database.url = ...`
    /// - `SYMPOSIUM__SESSION__SECURE=true` -> `session.secure = true`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SYMPOSIUM")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        if let Some(database) = &self.database {
            database.validate()?;
        }
        self.session.validate(&self.server.environment)?;
        self.chat.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
