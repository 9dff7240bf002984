use crate::config::types::{Config, FetcherConfig, ServerConfig, StorageConfig};
use crate::ConfigError;
use std::net::SocketAddr;

const MAX_TIMEOUT_SECS: u64 = 600;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_storage_config(&config.storage)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_server_config(&config.server)?;
    Ok(())
}

fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.database_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    for (name, value) in [
        ("crawl_timeout_secs", config.crawl_timeout_secs),
        ("scrape_timeout_secs", config.scrape_timeout_secs),
    ] {
        if !(1..=MAX_TIMEOUT_SECS).contains(&value) {
            return Err(ConfigError::Validation(format!(
                "{} must be between 1 and {}, got {}",
                name, MAX_TIMEOUT_SECS, value
            )));
        }
    }

    Ok(())
}

fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    config
        .bind_address
        .parse::<SocketAddr>()
        .map_err(|e| ConfigError::InvalidAddress(format!("{}: {}", config.bind_address, e)))?;
    Ok(())
}
