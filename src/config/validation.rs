//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use url::Url;

use super::Settings;
use crate::utils::errors::{FleetCheckError, Result};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_sheets_config(&settings.sheets)?;
    validate_session_config(&settings.session)?;
    validate_logging_config(&settings.logging)?;
    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.token.is_empty() {
        return Err(FleetCheckError::Config("Bot token is required".to_string()));
    }

    if config.admin_ids.is_empty() {
        return Err(FleetCheckError::Config(
            "At least one admin ID must be configured".to_string(),
        ));
    }

    if let Some(ref webhook_url) = config.webhook_url {
        Url::parse(webhook_url)?;
        if config.webhook_port.is_none() {
            return Err(FleetCheckError::Config(
                "Webhook URL requires a listen port".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validate Google Sheets configuration
fn validate_sheets_config(config: &super::SheetsConfig) -> Result<()> {
    if config.spreadsheet_id.is_empty() {
        return Err(FleetCheckError::Config(
            "Spreadsheet ID is required".to_string(),
        ));
    }

    if config.service_account_path.is_empty() {
        return Err(FleetCheckError::Config(
            "Service account key path is required".to_string(),
        ));
    }

    if config.vehicles_sheet.is_empty() || config.inspections_sheet.is_empty() {
        return Err(FleetCheckError::Config(
            "Sheet names must not be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validate session store configuration
fn validate_session_config(config: &super::SessionConfig) -> Result<()> {
    if config.ttl_seconds == 0 {
        return Err(FleetCheckError::Config(
            "Session TTL must be greater than 0".to_string(),
        ));
    }

    if config.cleanup_interval_seconds == 0 {
        return Err(FleetCheckError::Config(
            "Session cleanup interval must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(FleetCheckError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(FleetCheckError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    Ok(())
}
