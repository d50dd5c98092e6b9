/// CheckIn entity for recording one completed day of a streak
///
/// Each time a user checks in, we create a CheckIn pinned to a calendar day
/// (UTC, no time of day). At most one check-in exists per streak and day;
/// the service layer enforces that with a lookup before insert.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{CheckInId, DomainError, StreakId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckIn {
    /// Unique identifier for this check-in
    pub id: CheckInId,
    /// The streak this check-in belongs to
    pub streak_id: StreakId,
    /// Which calendar day this check-in is for (UTC, day granularity)
    pub check_in_date: NaiveDate,
    /// When the check-in was actually recorded
    pub checked_in_at: DateTime<Utc>,
    /// Optional user notes about the day
    pub notes: Option<String>,
}

impl CheckIn {
    /// Create a new check-in with validation
    pub fn new(
        streak_id: StreakId,
        check_in_date: NaiveDate,
        notes: Option<String>,
    ) -> Result<Self, DomainError> {
        Self::validate_date(&check_in_date)?;
        Self::validate_notes(&notes)?;

        Ok(Self {
            id: CheckInId::new(),
            streak_id,
            check_in_date,
            checked_in_at: Utc::now(),
            notes,
        })
    }

    /// Create a check-in from existing data (used when loading from the database)
    pub fn from_existing(
        id: CheckInId,
        streak_id: StreakId,
        check_in_date: NaiveDate,
        checked_in_at: DateTime<Utc>,
        notes: Option<String>,
    ) -> Self {
        Self {
            id,
            streak_id,
            check_in_date,
            checked_in_at,
            notes,
        }
    }

    pub fn has_notes(&self) -> bool {
        matches!(&self.notes, Some(n) if !n.trim().is_empty())
    }

    // Validation helper methods

    /// Check-ins are for today or the past, never the future
    fn validate_date(date: &NaiveDate) -> Result<(), DomainError> {
        let today = Utc::now().date_naive();
        if *date > today {
            return Err(DomainError::InvalidDate(
                "Cannot check in for a future date".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_notes(notes: &Option<String>) -> Result<(), DomainError> {
        if let Some(note_text) = notes {
            if note_text.len() > 500 {
                return Err(DomainError::Validation {
                    message: "Notes cannot be longer than 500 characters".to_string(),
                });
            }
        }
        Ok(())
    }
}
