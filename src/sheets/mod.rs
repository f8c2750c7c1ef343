//! Spreadsheet storage boundary
//!
//! Two logical tables live in one Google spreadsheet: `Vehicles`
//! (plate, assigned user id, assigned username) and `Inspections` (one
//! append-only row per completed inspection). Everything above this module
//! talks to a [`RowStore`], so business logic never sees HTTP.

pub mod auth;
pub mod client;
pub mod directory;
pub mod inspections;
pub mod memory;

use async_trait::async_trait;

use crate::utils::errors::Result;

pub use auth::{ServiceAccountAuth, ServiceAccountKey};
pub use client::GoogleSheetsClient;
pub use directory::{ClaimOutcome, VehicleDirectory};
pub use inspections::InspectionLog;
pub use memory::MemorySheet;

/// The three operations the storage backend offers: read every row of a
/// sheet, append a row, update a single cell keyed by 1-based row and column.
/// There is no transaction primitive; `claim` layers an optimistic re-check
/// on top of these.
#[async_trait]
pub trait RowStore: Send + Sync {
    /// All rows of the named sheet, header included. Trailing empty cells may
    /// be absent from a row.
    async fn read_rows(&self, sheet: &str) -> Result<Vec<Vec<String>>>;

    /// Append one row after the last non-empty row of the sheet.
    async fn append_row(&self, sheet: &str, row: Vec<String>) -> Result<()>;

    /// Overwrite a single cell. `row` and `col` are 1-based.
    async fn update_cell(&self, sheet: &str, row: u32, col: u32, value: &str) -> Result<()>;
}
