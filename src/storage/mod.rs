/// Storage layer for persisting tracker data
///
/// This module defines one storage trait per entity type, mirroring the
/// lookups the engines need. Absence is reported as Ok(None) rather than an
/// error so the service layer owns the not-found semantics. Two backends
/// exist: SQLite for real persistence and an in-memory fake for engine tests.

pub mod memory;
pub mod migrations;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStorage;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{
    Achievement, AchievementId, CheckIn, CheckInId, Habit, HabitId, Streak, StreakId, User, UserId,
};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Storage interface for users
pub trait UserStore {
    fn create_user(&self, user: &User) -> Result<(), StorageError>;
    fn find_user(&self, id: UserId) -> Result<Option<User>, StorageError>;
    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError>;
    fn list_users(&self) -> Result<Vec<User>, StorageError>;
    fn update_user(&self, user: &User) -> Result<(), StorageError>;
    fn delete_user(&self, id: UserId) -> Result<(), StorageError>;
}

/// Storage interface for habits
///
/// delete_habit is a soft delete: the row is retained but excluded from
/// every lookup from then on.
pub trait HabitStore {
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError>;
    fn find_habit(&self, id: HabitId) -> Result<Option<Habit>, StorageError>;
    fn find_habits_by_user(&self, user_id: UserId) -> Result<Vec<Habit>, StorageError>;
    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError>;
    fn delete_habit(&self, id: HabitId) -> Result<(), StorageError>;
}

/// Storage interface for streaks
pub trait StreakStore {
    fn create_streak(&self, streak: &Streak) -> Result<(), StorageError>;
    fn find_streak(&self, id: StreakId) -> Result<Option<Streak>, StorageError>;
    fn find_streaks_by_habit(&self, habit_id: HabitId) -> Result<Vec<Streak>, StorageError>;
    /// The habit's streak whose status is exactly active; at most one exists
    fn find_active_streak(&self, habit_id: HabitId) -> Result<Option<Streak>, StorageError>;
    fn update_streak(&self, streak: &Streak) -> Result<(), StorageError>;
    fn delete_streak(&self, id: StreakId) -> Result<(), StorageError>;
}

/// Storage interface for check-ins
pub trait CheckInStore {
    fn create_check_in(&self, check_in: &CheckIn) -> Result<(), StorageError>;
    fn find_check_in(&self, id: CheckInId) -> Result<Option<CheckIn>, StorageError>;
    fn find_check_ins_by_streak(&self, streak_id: StreakId) -> Result<Vec<CheckIn>, StorageError>;
    /// Exact-day match
    fn find_check_in_by_date(
        &self,
        streak_id: StreakId,
        date: NaiveDate,
    ) -> Result<Option<CheckIn>, StorageError>;
    /// The streak's most recent check-in by date
    fn find_latest_check_in(&self, streak_id: StreakId) -> Result<Option<CheckIn>, StorageError>;
    fn delete_check_in(&self, id: CheckInId) -> Result<(), StorageError>;
}

/// Storage interface for achievements
pub trait AchievementStore {
    fn create_achievement(&self, achievement: &Achievement) -> Result<(), StorageError>;
    fn find_achievement(&self, id: AchievementId) -> Result<Option<Achievement>, StorageError>;
    fn find_achievements_by_user(&self, user_id: UserId)
        -> Result<Vec<Achievement>, StorageError>;
    fn find_achievements_by_habit(
        &self,
        habit_id: HabitId,
    ) -> Result<Vec<Achievement>, StorageError>;
    fn delete_achievement(&self, id: AchievementId) -> Result<(), StorageError>;
}

/// Everything the engines need from a backend, in one bound
pub trait Store: UserStore + HabitStore + StreakStore + CheckInStore + AchievementStore {}

impl<S> Store for S where S: UserStore + HabitStore + StreakStore + CheckInStore + AchievementStore {}
