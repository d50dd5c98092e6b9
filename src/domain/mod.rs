/// Domain module containing core business entities and their validation
///
/// This module defines the entities (User, Habit, Streak, CheckIn,
/// Achievement) and the rules they enforce on construction. The streak
/// lifecycle itself lives in the service layer; entities here only guard
/// their own field invariants.

pub mod achievement;
pub mod checkin;
pub mod habit;
pub mod streak;
pub mod types;
pub mod user;

// Re-export public types for easy access
pub use achievement::*;
pub use checkin::*;
pub use habit::*;
pub use streak::*;
pub use types::*;
pub use user::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid habit name: {0}")]
    InvalidHabitName(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}
