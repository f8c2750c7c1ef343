//! In-memory [`RowStore`] used by tests
//!
//! Mirrors the append / update-cell semantics of the Sheets backend on a
//! `HashMap` of tabs, and counts reads so tests can assert that a code path
//! never touched the store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::sheets::RowStore;
use crate::utils::errors::Result;

#[derive(Debug, Default)]
pub struct MemorySheet {
    tabs: Mutex<HashMap<String, Vec<Vec<String>>>>,
    reads: AtomicUsize,
}

impl MemorySheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents of a tab, header row included.
    pub async fn seed(&self, sheet: &str, rows: Vec<Vec<&str>>) {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(str::to_string).collect())
            .collect();
        self.tabs.lock().await.insert(sheet.to_string(), rows);
    }

    /// Current contents of a tab.
    pub async fn rows(&self, sheet: &str) -> Vec<Vec<String>> {
        self.tabs.lock().await.get(sheet).cloned().unwrap_or_default()
    }

    /// How many times `read_rows` has been called, across all tabs.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RowStore for MemorySheet {
    async fn read_rows(&self, sheet: &str) -> Result<Vec<Vec<String>>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.rows(sheet).await)
    }

    async fn append_row(&self, sheet: &str, row: Vec<String>) -> Result<()> {
        self.tabs
            .lock()
            .await
            .entry(sheet.to_string())
            .or_default()
            .push(row);
        Ok(())
    }

    async fn update_cell(&self, sheet: &str, row: u32, col: u32, value: &str) -> Result<()> {
        let mut tabs = self.tabs.lock().await;
        let rows = tabs.entry(sheet.to_string()).or_default();

        let row_idx = row as usize - 1;
        let col_idx = col as usize - 1;
        if rows.len() <= row_idx {
            rows.resize(row_idx + 1, Vec::new());
        }
        let cells = &mut rows[row_idx];
        if cells.len() <= col_idx {
            cells.resize(col_idx + 1, String::new());
        }
        cells[col_idx] = value.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::RowStore;

    #[tokio::test]
    async fn update_cell_grows_rows_and_columns() {
        let sheet = MemorySheet::new();
        sheet.update_cell("Vehicles", 3, 2, "42").await.unwrap();

        let rows = sheet.rows("Vehicles").await;
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2], vec!["".to_string(), "42".to_string()]);
    }

    #[tokio::test]
    async fn read_counter_tracks_reads() {
        let sheet = MemorySheet::new();
        assert_eq!(sheet.read_count(), 0);
        sheet.read_rows("Vehicles").await.unwrap();
        sheet.read_rows("Inspections").await.unwrap();
        assert_eq!(sheet.read_count(), 2);
    }
}
