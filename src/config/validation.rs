//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use super::Settings;
use crate::utils::errors::{CourtsideError, Result};
use crate::utils::helpers::is_valid_email;

/// Minimum length of the token signing secret
const MIN_SECRET_LENGTH: usize = 16;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_database_config(&settings.database)?;
    validate_auth_config(&settings.auth)?;
    validate_mail_config(&settings.mail)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(CourtsideError::Config("Server host is required".to_string()));
    }

    if config.port == 0 {
        return Err(CourtsideError::Config("Server port must be greater than 0".to_string()));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(CourtsideError::Config("Database URL is required".to_string()));
    }

    if config.max_connections == 0 {
        return Err(CourtsideError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(CourtsideError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    Ok(())
}

fn validate_auth_config(config: &super::AuthConfig) -> Result<()> {
    if config.jwt_secret.len() < MIN_SECRET_LENGTH {
        return Err(CourtsideError::Config(format!(
            "JWT secret must be at least {} characters",
            MIN_SECRET_LENGTH
        )));
    }

    if config.token_ttl_hours == 0 {
        return Err(CourtsideError::Config(
            "Token TTL must be greater than 0".to_string(),
        ));
    }

    if !(4..=31).contains(&config.bcrypt_cost) {
        return Err(CourtsideError::Config(
            "bcrypt cost must be between 4 and 31".to_string(),
        ));
    }

    Ok(())
}

/// Validate mail configuration
fn validate_mail_config(config: &super::MailConfig) -> Result<()> {
    if config.batch_size == 0 {
        return Err(CourtsideError::Config(
            "Mail batch size must be greater than 0".to_string(),
        ));
    }

    if config.max_attempts == 0 {
        return Err(CourtsideError::Config(
            "Mail max attempts must be greater than 0".to_string(),
        ));
    }

    if !is_valid_email(&config.from_address) {
        return Err(CourtsideError::Config(format!(
            "Invalid mail from address: {}",
            config.from_address
        )));
    }

    if config.enabled {
        url::Url::parse(&config.api_url)
            .map_err(|e| CourtsideError::Config(format!("Invalid mail API URL: {}", e)))?;

        if config.timeout_seconds == 0 {
            return Err(CourtsideError::Config(
                "Mail timeout must be greater than 0".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(CourtsideError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(CourtsideError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    Ok(())
}
