//! Inspection flow integration tests
//!
//! Walks the two-photo inspection conversation against an in-memory sheet,
//! both for a registered driver (plate auto-filled from the directory) and
//! an unregistered one (plate typed after the second photo). Each completed
//! flow must land as exactly one row in the inspection log.

use std::sync::Arc;

use fleetcheck::services::InspectionService;
use fleetcheck::sheets::{InspectionLog, MemorySheet, VehicleDirectory};
use fleetcheck::state::{EventKind, Flow, SessionStore};

const VEHICLES: &str = "Vehicles";
const INSPECTIONS: &str = "Inspections";

async fn inspection_service() -> (Arc<MemorySheet>, InspectionService) {
    let sheet = Arc::new(MemorySheet::new());
    sheet
        .seed(
            VEHICLES,
            vec![
                vec!["Номер авто", "ID водителя", "Водитель"],
                vec!["A333BC", "42", "driver"],
            ],
        )
        .await;
    sheet
        .seed(
            INSPECTIONS,
            vec![vec![
                "Дата", "Время", "Номер", "Водитель", "Фото 1", "Фото 2", "ID",
            ]],
        )
        .await;
    let directory = VehicleDirectory::new(sheet.clone(), VEHICLES.to_string());
    let log = InspectionLog::new(sheet.clone(), INSPECTIONS.to_string());
    (sheet, InspectionService::new(directory, log))
}

#[tokio::test]
async fn registered_driver_completes_with_autofilled_plate() {
    let (sheet, service) = inspection_service().await;
    let sessions = SessionStore::new(3600);
    let chat_id = 42;

    // Check-in starts with the plate looked up from the directory
    let plate = service.plate_for(42).await.expect("lookup failed");
    assert_eq!(plate.as_deref(), Some("A333BC"));
    sessions
        .set_flow(chat_id, Flow::AwaitingPhotoOne { plate: plate.clone() })
        .await;

    // First photo
    let flow = sessions.flow(chat_id).await.unwrap();
    let flow = flow
        .advance(
            EventKind::Photo,
            Flow::AwaitingPhotoTwo {
                plate: plate.clone(),
                photo_one: "file-front".to_string(),
            },
        )
        .expect("first photo must advance");
    sessions.set_flow(chat_id, flow).await;

    // Second photo finishes the flow; the plate is already known
    service
        .record_inspection(42, "driver", "A333BC", "file-front", "file-back")
        .await
        .expect("record failed");
    sessions.clear_flow(chat_id).await;

    let rows = sheet.rows(INSPECTIONS).await;
    assert_eq!(rows.len(), 2, "exactly one appended inspection row");
    let row = &rows[1];
    assert_eq!(row[2], "A333BC");
    assert_eq!(row[3], "driver");
    assert_eq!(row[4], "file-front");
    assert_eq!(row[5], "file-back");
    assert_eq!(row[6], "42");
    assert!(sessions.flow(chat_id).await.is_none());
}

#[tokio::test]
async fn unregistered_driver_types_the_plate() {
    let (sheet, service) = inspection_service().await;

    // No directory row for this user, so the flow starts without a plate
    assert_eq!(service.plate_for(7).await.unwrap(), None);

    let flow = Flow::AwaitingPhotoOne { plate: None };
    let flow = flow
        .advance(
            EventKind::Photo,
            Flow::AwaitingPhotoTwo {
                plate: None,
                photo_one: "file-1".to_string(),
            },
        )
        .unwrap();
    let flow = flow
        .advance(
            EventKind::Photo,
            Flow::AwaitingPlateNumber {
                photo_one: "file-1".to_string(),
                photo_two: "file-2".to_string(),
            },
        )
        .unwrap();
    assert!(flow.accepts(EventKind::Text));

    service
        .record_inspection(7, "walkin", "b 777 xy", "file-1", "file-2")
        .await
        .expect("record failed");

    let rows = sheet.rows(INSPECTIONS).await;
    assert_eq!(rows.len(), 2);
    // Typed plate is normalized before it is written
    assert_eq!(rows[1][2], "B777XY");
}

#[tokio::test]
async fn inspection_row_carries_local_date_and_time() {
    let (sheet, service) = inspection_service().await;

    let record = service
        .record_inspection(42, "driver", "A333BC", "p1", "p2")
        .await
        .unwrap();

    let rows = sheet.rows(INSPECTIONS).await;
    assert_eq!(rows[1][0], record.date);
    assert_eq!(rows[1][1], record.time);
    // dd.mm.yyyy and hh:mm:ss
    assert_eq!(record.date.len(), 10);
    assert_eq!(record.time.len(), 8);
}

#[tokio::test]
async fn photo_states_only_accept_photos() {
    let flow = Flow::AwaitingPhotoTwo {
        plate: Some("A333BC".to_string()),
        photo_one: "p1".to_string(),
    };
    assert!(!flow.accepts(EventKind::Text));
    assert!(!flow.accepts(EventKind::Choice));
    assert!(flow.accepts(EventKind::Photo));
}
