//! Vehicle directory accessor
//!
//! Reads and mutates the `Vehicles` sheet: one row per vehicle, columns
//! `[plate, assigned user id, assigned username]` under a header row. The
//! claim rule keeps the at-most-one-assignee invariant; the store itself
//! enforces nothing.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::models::VehicleRecord;
use crate::sheets::RowStore;
use crate::utils::errors::{FleetCheckError, Result};
use crate::utils::plate::{matches_query, normalize_plate, MIN_QUERY_DIGITS};

const COL_USER_ID: u32 = 2;
const COL_USERNAME: u32 = 3;
/// Data rows start below the header.
const FIRST_DATA_ROW: u32 = 2;

/// Result of a claim attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    Claimed,
    AlreadyAssigned { holder: Option<String> },
}

#[derive(Clone)]
pub struct VehicleDirectory {
    store: Arc<dyn RowStore>,
    sheet: String,
}

impl VehicleDirectory {
    pub fn new(store: Arc<dyn RowStore>, sheet: String) -> Self {
        Self { store, sheet }
    }

    fn parse_row(row_number: u32, cells: &[String]) -> Option<VehicleRecord> {
        let plate = normalize_plate(cells.first()?.as_str());
        if plate.is_empty() {
            return None;
        }
        let assigned_user_id = cells
            .get(1)
            .and_then(|cell| cell.trim().parse::<i64>().ok());
        let assigned_username = cells
            .get(2)
            .map(|cell| cell.trim().to_string())
            .filter(|name| !name.is_empty());
        Some(VehicleRecord {
            row: row_number,
            plate,
            assigned_user_id,
            assigned_username,
        })
    }

    /// Every vehicle row, header skipped, blank plates ignored.
    pub async fn load_all(&self) -> Result<Vec<VehicleRecord>> {
        let rows = self.store.read_rows(&self.sheet).await?;
        let records = rows
            .iter()
            .enumerate()
            .skip(FIRST_DATA_ROW as usize - 1)
            .filter_map(|(idx, cells)| Self::parse_row(idx as u32 + 1, cells))
            .collect::<Vec<_>>();
        debug!(sheet = %self.sheet, count = records.len(), "Loaded vehicle directory");
        Ok(records)
    }

    /// Digit-substring search against each plate's digits-only projection.
    /// Queries with fewer than [`MIN_QUERY_DIGITS`] digits are rejected before
    /// the store is consulted.
    pub async fn find_by_partial_plate(&self, digit_query: &str) -> Result<Vec<VehicleRecord>> {
        if digit_query.len() < MIN_QUERY_DIGITS || !digit_query.chars().all(|c| c.is_ascii_digit())
        {
            return Err(FleetCheckError::InvalidInput(format!(
                "query must carry at least {MIN_QUERY_DIGITS} digits"
            )));
        }

        let records = self.load_all().await?;
        Ok(records
            .into_iter()
            .filter(|record| matches_query(&record.plate, digit_query))
            .collect())
    }

    /// Claim a plate for a user.
    ///
    /// Assigned to someone else: `AlreadyAssigned`, existing assignment
    /// untouched. Assigned to the same user: idempotent success. Unassigned:
    /// the row is re-read immediately before writing both assignment cells —
    /// the store has no compare-and-swap, so two simultaneous claims can still
    /// race inside that window; that residual race is accepted. Unknown plate:
    /// a new row is appended with the assignment pre-filled.
    pub async fn claim(&self, plate: &str, user_id: i64, username: &str) -> Result<ClaimOutcome> {
        let plate = normalize_plate(plate);
        let records = self.load_all().await?;

        let Some(target) = records.into_iter().find(|record| record.plate == plate) else {
            info!(plate = %plate, user_id = user_id, "Plate not in directory, appending claimed row");
            self.store
                .append_row(
                    &self.sheet,
                    vec![plate, user_id.to_string(), username.to_string()],
                )
                .await?;
            return Ok(ClaimOutcome::Claimed);
        };

        if target.is_assigned_to(user_id) {
            return Ok(ClaimOutcome::Claimed);
        }
        if target.is_assigned() {
            return Ok(ClaimOutcome::AlreadyAssigned {
                holder: target.assigned_username,
            });
        }

        // Optimistic re-check: somebody may have claimed the row between the
        // directory read and now.
        let fresh = self.reread_row(target.row).await?;
        if let Some(fresh) = fresh {
            if fresh.is_assigned() && !fresh.is_assigned_to(user_id) {
                warn!(plate = %plate, row = target.row, "Claim lost race, row assigned during re-check");
                return Ok(ClaimOutcome::AlreadyAssigned {
                    holder: fresh.assigned_username,
                });
            }
        }

        self.store
            .update_cell(&self.sheet, target.row, COL_USER_ID, &user_id.to_string())
            .await?;
        self.store
            .update_cell(&self.sheet, target.row, COL_USERNAME, username)
            .await?;

        info!(plate = %plate, user_id = user_id, row = target.row, "Plate claimed");
        Ok(ClaimOutcome::Claimed)
    }

    /// Blank the assignment of whatever row is held by `user_id`.
    pub async fn release(&self, user_id: i64) -> Result<()> {
        let records = self.load_all().await?;
        let Some(target) = records.into_iter().find(|r| r.is_assigned_to(user_id)) else {
            debug!(user_id = user_id, "Release requested but no row is assigned");
            return Ok(());
        };

        self.store
            .update_cell(&self.sheet, target.row, COL_USER_ID, "")
            .await?;
        self.store
            .update_cell(&self.sheet, target.row, COL_USERNAME, "")
            .await?;

        info!(user_id = user_id, plate = %target.plate, "Plate released");
        Ok(())
    }

    /// The record currently assigned to `user_id`, if any.
    pub async fn lookup_by_user(&self, user_id: i64) -> Result<Option<VehicleRecord>> {
        let records = self.load_all().await?;
        Ok(records.into_iter().find(|r| r.is_assigned_to(user_id)))
    }

    async fn reread_row(&self, row_number: u32) -> Result<Option<VehicleRecord>> {
        let rows = self.store.read_rows(&self.sheet).await?;
        Ok(rows
            .get(row_number as usize - 1)
            .and_then(|cells| Self::parse_row(row_number, cells)))
    }
}

impl std::fmt::Debug for VehicleDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VehicleDirectory")
            .field("sheet", &self.sheet)
            .finish_non_exhaustive()
    }
}
