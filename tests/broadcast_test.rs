//! Admin broadcast integration tests
//!
//! Exercises the broadcast path with a scripted sender: selection toggling
//! in the session store, skipping of unassigned rows, and per-recipient
//! failure isolation.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use fleetcheck::services::{BroadcastService, ReminderSender};
use fleetcheck::sheets::{MemorySheet, VehicleDirectory};
use fleetcheck::state::SessionStore;
use fleetcheck::utils::errors::{FleetCheckError, Result};

const VEHICLES: &str = "Vehicles";

/// Records every delivery attempt; fails for user ids listed in `failing`.
struct ScriptedSender {
    delivered: Mutex<Vec<i64>>,
    failing: Vec<i64>,
}

impl ScriptedSender {
    fn new(failing: Vec<i64>) -> Self {
        Self {
            delivered: Mutex::new(Vec::new()),
            failing,
        }
    }
}

#[async_trait]
impl ReminderSender for ScriptedSender {
    async fn send_reminder(&self, user_id: i64, _text: &str) -> Result<()> {
        if self.failing.contains(&user_id) {
            return Err(FleetCheckError::SheetsApi("delivery refused".to_string()));
        }
        self.delivered.lock().await.push(user_id);
        Ok(())
    }
}

async fn fleet() -> (Arc<MemorySheet>, VehicleDirectory) {
    let sheet = Arc::new(MemorySheet::new());
    sheet
        .seed(
            VEHICLES,
            vec![
                vec!["Номер авто", "ID водителя", "Водитель"],
                vec!["A333BC", "42", "first"],
                vec!["A123BC", "43", "second"],
                vec!["B777XY"],
            ],
        )
        .await;
    let directory = VehicleDirectory::new(sheet.clone(), VEHICLES.to_string());
    (sheet, directory)
}

#[tokio::test]
async fn broadcast_reaches_selected_assigned_drivers_only() {
    let (_, directory) = fleet().await;
    let sender = Arc::new(ScriptedSender::new(vec![]));
    let service = BroadcastService::new(directory, sender.clone());

    let sessions = SessionStore::new(3600);
    let admin_chat = 1;
    // Admin toggles rows 2 and 4; row 4 has no assigned driver
    sessions.toggle_selection(admin_chat, 2).await;
    sessions.toggle_selection(admin_chat, 4).await;

    let selection = sessions.take_selection(admin_chat).await;
    let summary = service.send_reminders(&selection).await.expect("broadcast failed");

    assert_eq!(summary.sent, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.skipped, 1);
    assert_eq!(*sender.delivered.lock().await, vec![42]);

    // The selection was consumed
    assert!(sessions.selection(admin_chat).await.is_empty());
}

#[tokio::test]
async fn one_failed_delivery_does_not_abort_the_rest() {
    let (_, directory) = fleet().await;
    let sender = Arc::new(ScriptedSender::new(vec![42]));
    let service = BroadcastService::new(directory, sender.clone());

    let selection = [2u32, 3u32].into_iter().collect();
    let summary = service.send_reminders(&selection).await.expect("broadcast failed");

    assert_eq!(summary.sent, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.skipped, 0);
    assert_eq!(*sender.delivered.lock().await, vec![43]);
}

#[tokio::test]
async fn toggling_twice_deselects() {
    let sessions = SessionStore::new(3600);
    sessions.toggle_selection(1, 2).await;
    let after = sessions.toggle_selection(1, 2).await;
    assert!(after.is_empty());
}

#[tokio::test]
async fn two_admin_chats_have_independent_selections() {
    let sessions = SessionStore::new(3600);
    sessions.toggle_selection(1, 2).await;
    sessions.toggle_selection(2, 3).await;

    assert_eq!(sessions.selection(1).await.into_iter().collect::<Vec<_>>(), vec![2]);
    assert_eq!(sessions.selection(2).await.into_iter().collect::<Vec<_>>(), vec![3]);
}
