//! Inspection record model

use chrono::Local;
use serde::{Deserialize, Serialize};

/// One completed vehicle inspection, appended to the `Inspections` sheet.
/// Immutable once appended; there is no update or delete path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionRecord {
    pub date: String,
    pub time: String,
    pub plate: String,
    pub reporter: String,
    pub photo_ref_1: String,
    pub photo_ref_2: String,
    pub user_id: i64,
}

impl InspectionRecord {
    /// Build a record with the date and time captured now, in the server's
    /// local timezone.
    pub fn now(
        plate: String,
        reporter: String,
        photo_ref_1: String,
        photo_ref_2: String,
        user_id: i64,
    ) -> Self {
        let stamp = Local::now();
        Self {
            date: stamp.format("%d.%m.%Y").to_string(),
            time: stamp.format("%H:%M:%S").to_string(),
            plate,
            reporter,
            photo_ref_1,
            photo_ref_2,
            user_id,
        }
    }

    /// Row layout of the `Inspections` sheet.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.date.clone(),
            self.time.clone(),
            self.plate.clone(),
            self.reporter.clone(),
            self.photo_ref_1.clone(),
            self.photo_ref_2.clone(),
            self.user_id.to_string(),
        ]
    }
}
