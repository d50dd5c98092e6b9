/// Service layer: the streak lifecycle engine and its sibling operations
///
/// Operations are free functions generic over the storage traits, so they
/// run identically against SQLite and the in-memory fake. Every failure is
/// a tagged ServiceError variant; callers branch on the variant (or its
/// ErrorKind), never on message text.

pub mod achievement;
pub mod checkin;
pub mod habit;
pub mod streak;
pub mod user;

pub use achievement::*;
pub use checkin::*;
pub use habit::*;
pub use streak::*;
pub use user::*;

use thiserror::Error;

use crate::domain::DomainError;
use crate::storage::StorageError;

/// Errors surfaced by the service operations
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Habit absent, or owned by another user - reported identically so the
    /// existence of other users' data never leaks
    #[error("Habit not found")]
    HabitNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Achievement not found")]
    AchievementNotFound,

    #[error("No active streak found. Please start a new streak first")]
    NoActiveStreak,

    #[error("An active streak already exists for this habit")]
    ActiveStreakExists,

    #[error("Target days must be greater than 0, got {target_days}")]
    InvalidTargetDays { target_days: i32 },

    #[error("Already checked in today")]
    AlreadyCheckedIn,

    #[error("Streak broken! You missed a day. The streak has been deleted. Please start a new streak")]
    StreakBroken,

    #[error("An account with this email already exists")]
    EmailTaken,

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Coarse classification the HTTP layer maps onto status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    BadRequest,
    Internal,
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::HabitNotFound
            | ServiceError::UserNotFound
            | ServiceError::AchievementNotFound
            | ServiceError::NoActiveStreak => ErrorKind::NotFound,

            ServiceError::ActiveStreakExists
            | ServiceError::AlreadyCheckedIn
            | ServiceError::EmailTaken => ErrorKind::Conflict,

            ServiceError::InvalidTargetDays { .. }
            | ServiceError::StreakBroken
            | ServiceError::Domain(_) => ErrorKind::BadRequest,

            ServiceError::Storage(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_mapping() {
        assert_eq!(ServiceError::HabitNotFound.kind(), ErrorKind::NotFound);
        assert_eq!(ServiceError::NoActiveStreak.kind(), ErrorKind::NotFound);
        assert_eq!(ServiceError::AlreadyCheckedIn.kind(), ErrorKind::Conflict);
        assert_eq!(ServiceError::ActiveStreakExists.kind(), ErrorKind::Conflict);
        assert_eq!(ServiceError::StreakBroken.kind(), ErrorKind::BadRequest);
        assert_eq!(
            ServiceError::InvalidTargetDays { target_days: 0 }.kind(),
            ErrorKind::BadRequest
        );
        assert_eq!(
            ServiceError::Storage(StorageError::Connection("down".to_string())).kind(),
            ErrorKind::Internal
        );
    }
}
