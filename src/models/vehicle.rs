//! Vehicle directory model

use serde::{Deserialize, Serialize};

/// One row of the `Vehicles` sheet.
///
/// `row` is the 1-based sheet row the record was read from; the header
/// occupies row 1, so data rows start at 2. At most one row carries a given
/// user's id at a time — enforced by the claim rule, not by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub row: u32,
    pub plate: String,
    pub assigned_user_id: Option<i64>,
    pub assigned_username: Option<String>,
}

impl VehicleRecord {
    pub fn is_assigned(&self) -> bool {
        self.assigned_user_id.is_some()
    }

    pub fn is_assigned_to(&self, user_id: i64) -> bool {
        self.assigned_user_id == Some(user_id)
    }
}
