//! Inspection business logic
//!
//! Collects the two photo references and a plate number gathered by the
//! inspection flow and appends exactly one record to the inspection log.

use tracing::info;

use crate::models::InspectionRecord;
use crate::sheets::{InspectionLog, VehicleDirectory};
use crate::utils::errors::Result;
use crate::utils::plate::normalize_plate;

#[derive(Debug, Clone)]
pub struct InspectionService {
    directory: VehicleDirectory,
    log: InspectionLog,
}

impl InspectionService {
    pub fn new(directory: VehicleDirectory, log: InspectionLog) -> Self {
        Self { directory, log }
    }

    /// Plate to pre-fill the flow with: the caller's directory assignment, if
    /// one exists. Without it the flow falls back to asking for a typed plate.
    pub async fn plate_for(&self, user_id: i64) -> Result<Option<String>> {
        Ok(self
            .directory
            .lookup_by_user(user_id)
            .await?
            .map(|record| record.plate))
    }

    /// Append the single record for a completed flow, timestamped now in the
    /// server's local timezone.
    pub async fn record_inspection(
        &self,
        user_id: i64,
        reporter: &str,
        plate: &str,
        photo_ref_1: &str,
        photo_ref_2: &str,
    ) -> Result<InspectionRecord> {
        let record = InspectionRecord::now(
            normalize_plate(plate),
            reporter.to_string(),
            photo_ref_1.to_string(),
            photo_ref_2.to_string(),
            user_id,
        );
        self.log.append(&record).await?;
        info!(user_id = user_id, plate = %record.plate, "Inspection flow completed");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::MemorySheet;
    use std::sync::Arc;

    async fn service() -> (Arc<MemorySheet>, InspectionService) {
        let sheet = Arc::new(MemorySheet::new());
        sheet
            .seed(
                "Vehicles",
                vec![
                    vec!["Номер авто", "ID водителя", "Водитель"],
                    vec!["A333BC", "42", "driver"],
                ],
            )
            .await;
        sheet.seed("Inspections", vec![vec!["Дата"]]).await;
        let directory = VehicleDirectory::new(sheet.clone(), "Vehicles".to_string());
        let log = InspectionLog::new(sheet.clone(), "Inspections".to_string());
        (sheet, InspectionService::new(directory, log))
    }

    #[tokio::test]
    async fn plate_autofill_prefers_assignment() {
        let (_, service) = service().await;
        assert_eq!(service.plate_for(42).await.unwrap(), Some("A333BC".to_string()));
        assert_eq!(service.plate_for(7).await.unwrap(), None);
    }

    #[tokio::test]
    async fn record_appends_exactly_one_row() {
        let (sheet, service) = service().await;
        service
            .record_inspection(42, "driver", "b777xy", "file-1", "file-2")
            .await
            .unwrap();

        let rows = sheet.rows("Inspections").await;
        assert_eq!(rows.len(), 2);
        let row = &rows[1];
        assert_eq!(row[2], "B777XY");
        assert_eq!(row[4], "file-1");
        assert_eq!(row[5], "file-2");
        assert_eq!(row[6], "42");
    }
}
