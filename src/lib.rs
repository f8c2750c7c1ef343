//! Fleetcheck Telegram Bot
//!
//! A Telegram bot coordinating vehicle check-in for a taxi fleet: drivers
//! register a license plate against their Telegram identity in a shared
//! spreadsheet, submit photo inspections, and administrators broadcast
//! reminders to assigned drivers.

pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod sheets;
pub mod state;
pub mod texts;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{FleetCheckError, Result};

// Re-export main components for easy access
pub use services::ServiceFactory;
pub use sheets::{GoogleSheetsClient, RowStore, VehicleDirectory};
pub use state::SessionStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
