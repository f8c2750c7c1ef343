//! Inspection log accessor
//!
//! Append-only writer for the `Inspections` sheet. One row per completed
//! inspection, never updated.

use std::sync::Arc;

use tracing::info;

use crate::models::InspectionRecord;
use crate::sheets::RowStore;
use crate::utils::errors::Result;

#[derive(Clone)]
pub struct InspectionLog {
    store: Arc<dyn RowStore>,
    sheet: String,
}

impl InspectionLog {
    pub fn new(store: Arc<dyn RowStore>, sheet: String) -> Self {
        Self { store, sheet }
    }

    pub async fn append(&self, record: &InspectionRecord) -> Result<()> {
        self.store.append_row(&self.sheet, record.to_row()).await?;
        info!(plate = %record.plate, user_id = record.user_id, "Inspection recorded");
        Ok(())
    }
}

impl std::fmt::Debug for InspectionLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InspectionLog")
            .field("sheet", &self.sheet)
            .finish_non_exhaustive()
    }
}
