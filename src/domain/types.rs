/// Core types and enums used throughout the domain layer
///
/// This module defines the typed identifiers and the small enums
/// (StreakStatus, AchievementType) shared by the domain entities.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

/// Unique identifier for a habit
///
/// A wrapper around UUID for type safety - you can't accidentally pass a
/// habit id where a streak id is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HabitId(pub Uuid);

/// Unique identifier for a streak
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StreakId(pub Uuid);

/// Unique identifier for a check-in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CheckInId(pub Uuid);

/// Unique identifier for an achievement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AchievementId(pub Uuid);

macro_rules! impl_id {
    ($name:ident) => {
        impl $name {
            /// Generate a new random identifier
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Parse an identifier from its string form (used when loading from the database)
            pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

impl_id!(UserId);
impl_id!(HabitId);
impl_id!(StreakId);
impl_id!(CheckInId);
impl_id!(AchievementId);

/// Lifecycle state of a streak
///
/// Every streak starts Active. Reaching the target day count moves it to
/// Completed. Failed exists in the schema for streaks invalidated without
/// deletion, but the current check-in flow deletes broken streaks instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakStatus {
    Active,
    Completed,
    Failed,
}

impl StreakStatus {
    /// Database/wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            StreakStatus::Active => "active",
            StreakStatus::Completed => "completed",
            StreakStatus::Failed => "failed",
        }
    }

    /// Parse the database representation back into the enum
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(StreakStatus::Active),
            "completed" => Some(StreakStatus::Completed),
            "failed" => Some(StreakStatus::Failed),
            _ => None,
        }
    }
}

/// Kind of milestone an achievement records
///
/// The known kinds get their own variants so call sites can branch without
/// string comparison. Custom keeps forward compatibility with kinds this
/// version doesn't know about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AchievementType {
    /// A streak reached its target day count
    StreakCompleted,
    /// An intermediate streak milestone (not emitted by the current engine)
    StreakMilestone,
    /// Unknown/forward-compatible kind
    Custom(String),
}

impl AchievementType {
    pub fn as_str(&self) -> &str {
        match self {
            AchievementType::StreakCompleted => "streak_completed",
            AchievementType::StreakMilestone => "streak_milestone",
            AchievementType::Custom(name) => name,
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "streak_completed" => AchievementType::StreakCompleted,
            "streak_milestone" => AchievementType::StreakMilestone,
            other => AchievementType::Custom(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_round_trip() {
        let id = HabitId::new();
        let parsed = HabitId::from_string(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_streak_status_round_trip() {
        for status in [StreakStatus::Active, StreakStatus::Completed, StreakStatus::Failed] {
            assert_eq!(StreakStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(StreakStatus::parse("bogus"), None);
    }

    #[test]
    fn test_achievement_type_keeps_unknown_kinds() {
        let parsed = AchievementType::parse("weekly_warrior");
        assert_eq!(parsed, AchievementType::Custom("weekly_warrior".to_string()));
        assert_eq!(parsed.as_str(), "weekly_warrior");
    }
}
