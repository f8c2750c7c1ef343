//! Registration business logic
//!
//! Matches a user-entered partial plate against the directory and claims an
//! unassigned row for the requesting user. Handlers translate the outcome
//! enums into replies and state transitions.

use tracing::{debug, info};

use crate::models::VehicleRecord;
use crate::sheets::{ClaimOutcome, VehicleDirectory};
use crate::utils::errors::Result;
use crate::utils::plate;

/// Result of a search over the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Fewer than the minimum digits; the store was not consulted.
    QueryTooShort,
    NoMatches,
    Matches(Vec<VehicleRecord>),
}

#[derive(Debug, Clone)]
pub struct RegistrationService {
    directory: VehicleDirectory,
}

impl RegistrationService {
    pub fn new(directory: VehicleDirectory) -> Self {
        Self { directory }
    }

    /// Free-text search input to matching directory rows.
    pub async fn search(&self, input: &str) -> Result<SearchOutcome> {
        let Some(query) = plate::parse_query(input) else {
            debug!(input = input, "Search query below minimum digit count");
            return Ok(SearchOutcome::QueryTooShort);
        };

        let matches = self.directory.find_by_partial_plate(&query).await?;
        if matches.is_empty() {
            Ok(SearchOutcome::NoMatches)
        } else {
            Ok(SearchOutcome::Matches(matches))
        }
    }

    /// Claim the chosen plate for the user. Both racers on the same plate get
    /// a decision: exactly one `Claimed`, the other `AlreadyAssigned`.
    pub async fn claim_plate(
        &self,
        plate: &str,
        user_id: i64,
        username: &str,
    ) -> Result<ClaimOutcome> {
        let outcome = self.directory.claim(plate, user_id, username).await?;
        info!(plate = plate, user_id = user_id, outcome = ?outcome, "Claim attempt resolved");
        Ok(outcome)
    }

    /// The plate currently assigned to the user, if any.
    pub async fn assigned_plate(&self, user_id: i64) -> Result<Option<String>> {
        Ok(self
            .directory
            .lookup_by_user(user_id)
            .await?
            .map(|record| record.plate))
    }

    /// Blank the user's assignment so a new vehicle can be claimed.
    pub async fn release(&self, user_id: i64) -> Result<()> {
        self.directory.release(user_id).await
    }
}
