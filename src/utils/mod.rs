//! Utility modules

pub mod errors;
pub mod logging;
pub mod plate;

pub use errors::{FleetCheckError, Result};
