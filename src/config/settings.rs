//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub sheets: SheetsConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    #[serde(default)]
    pub token: String,
    /// Public callback URL for webhook deployments. Accepted on the config
    /// surface; delivery currently runs via long polling.
    pub webhook_url: Option<String>,
    pub webhook_port: Option<u16>,
    #[serde(default)]
    pub admin_ids: Vec<i64>,
}

/// Google Sheets configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SheetsConfig {
    #[serde(default)]
    pub spreadsheet_id: String,
    #[serde(default = "default_service_account_path")]
    pub service_account_path: String,
    #[serde(default = "default_vehicles_sheet")]
    pub vehicles_sheet: String,
    #[serde(default = "default_inspections_sheet")]
    pub inspections_sheet: String,
}

/// Session store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default = "default_session_ttl")]
    pub ttl_seconds: u64,
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_path")]
    pub file_path: String,
}

fn default_service_account_path() -> String {
    "credentials.json".to_string()
}

fn default_vehicles_sheet() -> String {
    "Vehicles".to_string()
}

fn default_inspections_sheet() -> String {
    "Inspections".to_string()
}

fn default_session_ttl() -> u64 {
    3600
}

fn default_cleanup_interval() -> u64 {
    300
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_path() -> String {
    "./logs".to_string()
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            webhook_url: None,
            webhook_port: None,
            admin_ids: vec![],
        }
    }
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            service_account_path: default_service_account_path(),
            vehicles_sheet: default_vehicles_sheet(),
            inspections_sheet: default_inspections_sheet(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_session_ttl(),
            cleanup_interval_seconds: default_cleanup_interval(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_path: default_log_path(),
        }
    }
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("FLEETCHECK")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("bot.admin_ids")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::FleetCheckError> {
        super::validation::validate_settings(self)
    }
}
