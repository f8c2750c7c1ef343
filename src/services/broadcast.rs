//! Admin broadcast service
//!
//! Sends the fixed reminder to every selected directory row with an assigned
//! driver. A delivery failure for one recipient never aborts the rest; the
//! caller gets a sent/failed/skipped summary.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::ChatId;
use tracing::{info, warn};

use crate::sheets::VehicleDirectory;
use crate::texts;
use crate::utils::errors::Result;

/// Delivery seam: the bot in production, a scripted double in tests.
#[async_trait]
pub trait ReminderSender: Send + Sync {
    async fn send_reminder(&self, user_id: i64, text: &str) -> Result<()>;
}

/// Production sender over the Telegram bot.
#[derive(Clone)]
pub struct TelegramSender {
    bot: Bot,
}

impl TelegramSender {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ReminderSender for TelegramSender {
    async fn send_reminder(&self, user_id: i64, text: &str) -> Result<()> {
        self.bot.send_message(ChatId(user_id), text).await?;
        // Small delay between messages to avoid rate limiting
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        Ok(())
    }
}

/// Per-recipient outcome counters for one broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastSummary {
    pub sent: u32,
    pub failed: u32,
    /// Selected rows without an assigned driver.
    pub skipped: u32,
}

impl BroadcastSummary {
    pub fn render(&self) -> String {
        let text = texts::fill(texts::BROADCAST_SUMMARY, "sent", &self.sent.to_string());
        let text = texts::fill(&text, "failed", &self.failed.to_string());
        texts::fill(&text, "skipped", &self.skipped.to_string())
    }
}

#[derive(Clone)]
pub struct BroadcastService {
    directory: VehicleDirectory,
    sender: Arc<dyn ReminderSender>,
}

impl BroadcastService {
    pub fn new(directory: VehicleDirectory, sender: Arc<dyn ReminderSender>) -> Self {
        Self { directory, sender }
    }

    /// Every directory row, for rendering the admin's toggle keyboard.
    pub async fn list_vehicles(&self) -> Result<Vec<crate::models::VehicleRecord>> {
        self.directory.load_all().await
    }

    /// Send the reminder to every selected row's assigned driver.
    pub async fn send_reminders(&self, selected_rows: &BTreeSet<u32>) -> Result<BroadcastSummary> {
        let records = self.directory.load_all().await?;
        let mut summary = BroadcastSummary::default();

        for record in records.iter().filter(|r| selected_rows.contains(&r.row)) {
            let Some(user_id) = record.assigned_user_id else {
                summary.skipped += 1;
                continue;
            };

            match self.sender.send_reminder(user_id, texts::REMINDER_TEXT).await {
                Ok(()) => summary.sent += 1,
                Err(e) => {
                    warn!(user_id = user_id, plate = %record.plate, error = %e,
                          "Reminder delivery failed, continuing with remaining recipients");
                    summary.failed += 1;
                }
            }
        }

        info!(
            sent = summary.sent,
            failed = summary.failed,
            skipped = summary.skipped,
            "Broadcast completed"
        );
        Ok(summary)
    }
}

impl std::fmt::Debug for BroadcastService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BroadcastService").finish_non_exhaustive()
    }
}
