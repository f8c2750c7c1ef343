//! Services module
//!
//! This module contains business logic services

pub mod broadcast;
pub mod inspection;
pub mod registration;

pub use broadcast::{BroadcastService, BroadcastSummary, ReminderSender, TelegramSender};
pub use inspection::InspectionService;
pub use registration::{RegistrationService, SearchOutcome};

use std::collections::HashSet;
use std::sync::Arc;

use teloxide::Bot;
use tracing::debug;

use crate::config::Settings;
use crate::sheets::{InspectionLog, RowStore, VehicleDirectory};

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub registration_service: RegistrationService,
    pub inspection_service: InspectionService,
    pub broadcast_service: BroadcastService,
    admin_ids: HashSet<i64>,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(bot: Bot, settings: &Settings, store: Arc<dyn RowStore>) -> Self {
        let directory = VehicleDirectory::new(store.clone(), settings.sheets.vehicles_sheet.clone());
        let log = InspectionLog::new(store, settings.sheets.inspections_sheet.clone());

        let registration_service = RegistrationService::new(directory.clone());
        let inspection_service = InspectionService::new(directory.clone(), log);
        let broadcast_service =
            BroadcastService::new(directory, Arc::new(TelegramSender::new(bot)));

        Self {
            registration_service,
            inspection_service,
            broadcast_service,
            admin_ids: settings.bot.admin_ids.iter().copied().collect(),
        }
    }

    /// Whether the user may use the admin surface. Non-admins are silently
    /// ignored by the handlers; no error is surfaced.
    pub fn is_admin(&self, user_id: i64) -> bool {
        let admin = self.admin_ids.contains(&user_id);
        if !admin {
            debug!(user_id = user_id, "Ignoring admin request from non-admin");
        }
        admin
    }
}

impl std::fmt::Debug for ServiceFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceFactory")
            .field("admin_ids", &self.admin_ids)
            .finish_non_exhaustive()
    }
}
