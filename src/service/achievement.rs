/// Achievement emission and reads
///
/// The emitter is a small deterministic rule invoked by the check-in flow
/// when a streak reaches its target. Achievements are append-only; the read
/// operations decorate them with the habit name for display.

use serde::Serialize;

use crate::domain::{Achievement, AchievementId, HabitId, Streak, UserId};
use crate::service::{habit::owned_habit, ServiceError};
use crate::storage::{AchievementStore, HabitStore};

/// An achievement paired with the name of the habit it was earned on
#[derive(Debug, Clone, Serialize)]
pub struct AchievementDetails {
    pub achievement: Achievement,
    pub habit_name: Option<String>,
}

/// Record that a streak reached its target
///
/// Called by the check-in flow at the completion transition; returns the
/// stored achievement.
pub fn emit_streak_completed<S: AchievementStore>(
    store: &S,
    user_id: UserId,
    habit_id: HabitId,
    streak: &Streak,
) -> Result<Achievement, ServiceError> {
    let achievement =
        Achievement::streak_completed(user_id, habit_id, streak.id, streak.target_days);
    store.create_achievement(&achievement)?;

    tracing::info!(
        "Achievement earned: user {} completed a {}-day streak on habit {}",
        user_id,
        streak.target_days,
        habit_id
    );
    Ok(achievement)
}

/// All of the user's achievements, each with its habit name when the habit
/// still resolves
pub fn list_achievements<S: AchievementStore + HabitStore>(
    store: &S,
    user_id: UserId,
) -> Result<Vec<AchievementDetails>, ServiceError> {
    let achievements = store.find_achievements_by_user(user_id)?;

    let mut details = Vec::with_capacity(achievements.len());
    for achievement in achievements {
        let habit_name = store
            .find_habit(achievement.habit_id)?
            .map(|habit| habit.name);
        details.push(AchievementDetails {
            achievement,
            habit_name,
        });
    }

    Ok(details)
}

/// One achievement by id; ownership mismatch reads as absence
pub fn get_achievement<S: AchievementStore + HabitStore>(
    store: &S,
    user_id: UserId,
    achievement_id: AchievementId,
) -> Result<AchievementDetails, ServiceError> {
    let achievement = match store.find_achievement(achievement_id)? {
        Some(a) if a.user_id == user_id => a,
        _ => return Err(ServiceError::AchievementNotFound),
    };

    let habit_name = store
        .find_habit(achievement.habit_id)?
        .map(|habit| habit.name);

    Ok(AchievementDetails {
        achievement,
        habit_name,
    })
}

/// Achievements earned on one habit
pub fn list_habit_achievements<S: AchievementStore + HabitStore>(
    store: &S,
    user_id: UserId,
    habit_id: HabitId,
) -> Result<Vec<AchievementDetails>, ServiceError> {
    let habit = owned_habit(store, user_id, habit_id)?;

    let achievements = store.find_achievements_by_habit(habit.id)?;

    Ok(achievements
        .into_iter()
        .map(|achievement| AchievementDetails {
            achievement,
            habit_name: Some(habit.name.clone()),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AchievementType, Habit, User};
    use crate::storage::{HabitStore, MemoryStore, UserStore};
    use chrono::Utc;

    fn setup() -> (MemoryStore, User, Habit) {
        let store = MemoryStore::new();
        let user = User::new("a@b.c".to_string(), "A".to_string()).unwrap();
        store.create_user(&user).unwrap();
        let habit = Habit::new(user.id, "Meditate".to_string(), None, None, None).unwrap();
        store.create_habit(&habit).unwrap();
        (store, user, habit)
    }

    #[test]
    fn test_emit_persists_completed_achievement() {
        let (store, user, habit) = setup();
        let streak = Streak::start(habit.id, 7, Utc::now().date_naive());

        let achievement = emit_streak_completed(&store, user.id, habit.id, &streak).unwrap();

        assert_eq!(achievement.achievement_type, AchievementType::StreakCompleted);
        assert_eq!(achievement.target_days, 7);

        let listed = list_achievements(&store, user.id).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].habit_name.as_deref(), Some("Meditate"));
    }

    #[test]
    fn test_get_achievement_hides_other_users() {
        let (store, user, habit) = setup();
        let streak = Streak::start(habit.id, 7, Utc::now().date_naive());
        let achievement = emit_streak_completed(&store, user.id, habit.id, &streak).unwrap();

        let result = get_achievement(&store, UserId::new(), achievement.id);
        assert!(matches!(result, Err(ServiceError::AchievementNotFound)));

        let mine = get_achievement(&store, user.id, achievement.id).unwrap();
        assert_eq!(mine.achievement.id, achievement.id);
    }
}
