//! Error handling for Fleetcheck
//!
//! This module defines the main error type used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

use crate::texts;

/// Main error type for the Fleetcheck application
#[derive(Error, Debug)]
pub enum FleetCheckError {
    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Sheets API error: {0}")]
    SheetsApi(String),

    #[error("Service account authentication error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Plate already assigned: {plate}")]
    AlreadyAssigned { plate: String },

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Fleetcheck operations
pub type Result<T> = std::result::Result<T, FleetCheckError>;

impl FleetCheckError {
    /// Whether the error is a transient store/transport failure. Transient
    /// failures are logged and surfaced to the user as "try later"; the rest
    /// are either business conflicts or programming errors.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            FleetCheckError::Telegram(_)
                | FleetCheckError::Http(_)
                | FleetCheckError::SheetsApi(_)
                | FleetCheckError::Jwt(_)
                | FleetCheckError::Io(_)
        )
    }

    /// The message shown to the end user when this error reaches the handler
    /// boundary.
    pub fn user_message(&self) -> &'static str {
        match self {
            FleetCheckError::AlreadyAssigned { .. } => texts::PLATE_TAKEN,
            FleetCheckError::InvalidInput(_) => texts::INVALID_INPUT,
            _ => texts::TRY_LATER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        let api = FleetCheckError::SheetsApi("HTTP 500".to_string());
        assert!(api.is_transient());

        let conflict = FleetCheckError::AlreadyAssigned {
            plate: "A333BC".to_string(),
        };
        assert!(!conflict.is_transient());
        assert_eq!(conflict.user_message(), texts::PLATE_TAKEN);
    }
}
