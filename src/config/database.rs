//! Database configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Database configuration for the settlement ledger.
///
/// Optional; without it settlements are kept in memory.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum connections allowed
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Connection acquire timeout in seconds
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,

    /// Run migrations on startup
    #[serde(default)]
    pub run_migrations: bool,
}

impl DatabaseConfig {
    /// Get acquire timeout as Duration
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// Validate database configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::MissingRequired("DATABASE__URL"));
        }
        if !self.url.starts_with("postgres://") && !self.url.starts_with("postgresql://") {
            return Err(ValidationError::InvalidDatabaseUrl);
        }
        if self.max_connections == 0 || self.max_connections > 100 {
            return Err(ValidationError::InvalidPoolSize);
        }
        Ok(())
    }
}

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout() -> u64 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> DatabaseConfig {
        DatabaseConfig {
            url: url.to_string(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
            run_migrations: false,
        }
    }

    #[test]
    fn test_valid_postgres_urls() {
        assert!(config("postgres://localhost/db").validate().is_ok());
        assert!(config("postgresql://localhost/db").validate().is_ok());
    }

    #[test]
    fn test_invalid_url_scheme() {
        assert_eq!(
            config("mysql://localhost/db").validate(),
            Err(ValidationError::InvalidDatabaseUrl)
        );
    }

    #[test]
    fn test_pool_size_bounds() {
        let mut cfg = config("postgres://localhost/db");
        cfg.max_connections = 0;
        assert_eq!(cfg.validate(), Err(ValidationError::InvalidPoolSize));

        cfg.max_connections = 101;
        assert_eq!(cfg.validate(), Err(ValidationError::InvalidPoolSize));
    }

    #[test]
    fn test_acquire_timeout_duration() {
        assert_eq!(
            config("postgres://localhost/db").acquire_timeout(),
            Duration::from_secs(5)
        );
    }
}
