//! Publisher configuration loading.

use std::env;
use std::fs;
use std::path::Path;

use crate::domain::{AppError, PublisherConfig};

pub const DEFAULT_CONFIG_FILE: &str = "bipub.toml";
pub const TIMEOUT_ENV: &str = "BIPUB_TIMEOUT_SECS";

/// Load configuration from `path`, or from `./bipub.toml` when present.
///
/// An explicit path must exist; the default file is optional.
pub fn load_config(path: Option<&Path>) -> Result<PublisherConfig, AppError> {
    let mut config = match path {
        Some(path) => read_config(path)?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.is_file() {
                read_config(default_path)?
            } else {
                PublisherConfig::default()
            }
        }
    };

    apply_env_overrides(&mut config)?;
    config.validate()?;
    tracing::debug!(?config, "configuration loaded");
    Ok(config)
}

pub fn parse_config_content(content: &str) -> Result<PublisherConfig, AppError> {
    let config: PublisherConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

fn read_config(path: &Path) -> Result<PublisherConfig, AppError> {
    let content = fs::read_to_string(path).map_err(|err| {
        AppError::config_error(format!("Cannot read config file {}: {}", path.display(), err))
    })?;
    parse_config_content(&content)
}

fn apply_env_overrides(config: &mut PublisherConfig) -> Result<(), AppError> {
    if let Ok(raw) = env::var(TIMEOUT_ENV) {
        config.http.timeout_secs = raw.trim().parse().map_err(|_| {
            AppError::config_error(format!("{TIMEOUT_ENV} must be a number of seconds, got '{raw}'"))
        })?;
    }
    Ok(())
}
