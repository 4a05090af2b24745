//! API configuration

pub use config::ConfigError;
use serde::Deserialize;

use core_kernel::Timezone;
use infra_store::StoreBackend;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// HMAC secret the identity provider signs tokens with
    pub jwt_secret: String,
    /// Expected `iss` claim, unchecked when unset
    pub jwt_issuer: Option<String>,
    /// Expected `aud` claim, unchecked when unset
    pub jwt_audience: Option<String>,
    /// Database URL
    pub database_url: String,
    pub store_backend: StoreBackend,
    /// Log level
    pub log_level: String,
    pub log_format: LogFormat,
    /// IANA name of the calendar used for "today"
    pub default_timezone: String,
    /// Confirmed evidence needed to earn a checkoff when none is given
    pub evidence_threshold: u32,
    /// Upper bound on entries returned by a list or search
    pub max_page_size: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_issuer: None,
            jwt_audience: None,
            database_url: "postgres://localhost/journal".to_string(),
            store_backend: StoreBackend::Postgres,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            default_timezone: "UTC".to_string(),
            evidence_threshold: 3,
            max_page_size: 200,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `JOURNAL_`-prefixed environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let config: ApiConfig = config::Config::builder()
            .add_source(config::Environment::with_prefix("JOURNAL").try_parsing(true))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the service cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Message("jwt_secret must not be empty".to_string()));
        }
        self.timezone()?;
        if !(1..=10).contains(&self.evidence_threshold) {
            return Err(ConfigError::Message(format!(
                "evidence_threshold must be between 1 and 10, got {}",
                self.evidence_threshold
            )));
        }
        if self.max_page_size == 0 {
            return Err(ConfigError::Message("max_page_size must be positive".to_string()));
        }
        Ok(())
    }

    pub fn timezone(&self) -> Result<Timezone, ConfigError> {
        Timezone::parse(&self.default_timezone).map_err(|e| ConfigError::Message(e.to_string()))
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ApiConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.timezone().unwrap(), Timezone::default());
    }

    #[test]
    fn test_rejects_unknown_timezone_and_zero_threshold() {
        let config = ApiConfig {
            default_timezone: "Mars/Olympus".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ApiConfig {
            evidence_threshold: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
