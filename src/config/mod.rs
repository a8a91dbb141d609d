//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `VOGUEPAY` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use voguepay_gateway::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr().unwrap());
//! ```

mod database;
mod error;
mod gateway;
mod server;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use gateway::GatewayConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

use crate::ports::GatewaySettings;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (bind address, environment, host URL)
    #[serde(default)]
    pub server: ServerConfig,

    /// Gateway module configuration (merchant account)
    pub gateway: GatewayConfig,

    /// Settlement ledger database; in-memory when absent
    pub database: Option<DatabaseConfig>,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `VOGUEPAY` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `VOGUEPAY__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `VOGUEPAY__GATEWAY__MERCHANT_ID=...` -> `gateway.merchant_id = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("VOGUEPAY")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid value.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.gateway.validate(&self.server.environment)?;
        if let Some(database) = &self.database {
            database.validate()?;
        }
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }

    /// Settings the host exposes for the configured module, or `None` when disabled.
    pub fn gateway_settings(&self) -> Option<GatewaySettings> {
        if !self.gateway.enabled {
            return None;
        }

        Some(GatewaySettings {
            module_name: self.gateway.module_name.clone(),
            display_name: self.gateway.display_name.clone(),
            credentials: self.gateway.credentials(),
            developer_code: self.gateway.developer_code.clone(),
            system_url: self.server.system_url.clone(),
            callback_url: self.gateway.callback_url.clone(),
        })
    }
}
