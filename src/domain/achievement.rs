/// Achievement entity: an immutable record of a milestone reached
///
/// Achievements are write-once and append-only; nothing in the normal flow
/// updates or deletes them. The kind is a typed enum, while the metadata
/// stays an opaque JSON document so future kinds can attach whatever payload
/// they need.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{AchievementId, AchievementType, HabitId, StreakId, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    /// Unique identifier for this achievement
    pub id: AchievementId,
    /// The user who earned it
    pub user_id: UserId,
    /// The habit it was earned on
    pub habit_id: HabitId,
    /// What kind of milestone this records
    pub achievement_type: AchievementType,
    /// The streak target in effect when the milestone was reached
    pub target_days: i32,
    /// When the milestone was reached
    pub achieved_at: DateTime<Utc>,
    /// Kind-specific payload (e.g., {"streak_id": "..."})
    pub metadata: serde_json::Value,
}

impl Achievement {
    /// Record a completed streak
    pub fn streak_completed(
        user_id: UserId,
        habit_id: HabitId,
        streak_id: StreakId,
        target_days: i32,
    ) -> Self {
        Self {
            id: AchievementId::new(),
            user_id,
            habit_id,
            achievement_type: AchievementType::StreakCompleted,
            target_days,
            achieved_at: Utc::now(),
            metadata: serde_json::json!({ "streak_id": streak_id.to_string() }),
        }
    }

    /// Create an achievement from existing data (used when loading from the database)
    pub fn from_existing(
        id: AchievementId,
        user_id: UserId,
        habit_id: HabitId,
        achievement_type: AchievementType,
        target_days: i32,
        achieved_at: DateTime<Utc>,
        metadata: serde_json::Value,
    ) -> Self {
        Self {
            id,
            user_id,
            habit_id,
            achievement_type,
            target_days,
            achieved_at,
            metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streak_completed_carries_streak_reference() {
        let streak_id = StreakId::new();
        let achievement =
            Achievement::streak_completed(UserId::new(), HabitId::new(), streak_id, 7);

        assert_eq!(achievement.achievement_type, AchievementType::StreakCompleted);
        assert_eq!(achievement.target_days, 7);
        assert_eq!(
            achievement.metadata["streak_id"],
            serde_json::Value::String(streak_id.to_string())
        );
    }
}
