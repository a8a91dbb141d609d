//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid request timeout (must be 1-120 seconds)")]
    InvalidTimeout,

    #[error("System URL must be an absolute http(s) URL ending in '/'")]
    InvalidSystemUrl,

    #[error("Invalid merchant account email")]
    InvalidAccountEmail,

    #[error("Invalid {0} URL")]
    InvalidUrl(&'static str),

    #[error("Processor API URL must use HTTPS in production")]
    ApiUrlMustBeHttps,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool size must be between 1 and 100")]
    InvalidPoolSize,
}
