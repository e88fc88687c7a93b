//! Publisher configuration domain models.

use serde::{Deserialize, Serialize};

use crate::domain::AppError;

/// Configuration loaded from `bipub.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PublisherConfig {
    /// HTTP client configuration.
    #[serde(default)]
    pub http: HttpConfig,
    /// Anti-CSRF filter configuration.
    #[serde(default)]
    pub csrf: CsrfConfig,
}

impl PublisherConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        self.http.validate()
    }
}

/// HTTP client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    /// Read timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Connect timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: default_timeout(), connect_timeout_secs: default_connect_timeout() }
    }
}

impl HttpConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.timeout_secs == 0 {
            return Err(AppError::config_error("timeout_secs must be greater than 0"));
        }
        if self.connect_timeout_secs == 0 {
            return Err(AppError::config_error("connect_timeout_secs must be greater than 0"));
        }
        Ok(())
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CsrfConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self { enabled: default_true() }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = PublisherConfig::default();
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.http.connect_timeout_secs, 10);
        assert!(config.csrf.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_timeouts() {
        let config = HttpConfig { timeout_secs: 0, ..Default::default() };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, AppError::Configuration(msg) if msg.contains("timeout_secs")));

        let config = HttpConfig { connect_timeout_secs: 0, ..Default::default() };
        assert!(config.validate().is_err());
    }
}
