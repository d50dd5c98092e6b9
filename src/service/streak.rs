/// Streak lifecycle operations: starting attempts and reading their state
///
/// The one-active-streak-per-habit invariant is enforced here, at creation
/// time, by a lookup against the store - not by a database constraint.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{CheckIn, HabitId, Streak, UserId};
use crate::service::{habit::owned_habit, ServiceError};
use crate::storage::{CheckInStore, HabitStore, StreakStore};

/// Parameters for starting a streak
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStreakParams {
    pub target_days: i32,
}

/// An active streak together with its check-in history
#[derive(Debug, Clone, Serialize)]
pub struct StreakDetails {
    pub streak: Streak,
    pub check_ins: Vec<CheckIn>,
}

/// Start a new streak attempt for a habit
///
/// Fails when the habit isn't the caller's, when an active streak already
/// exists, or when the target is not positive.
pub fn create_streak<S: HabitStore + StreakStore>(
    store: &S,
    user_id: UserId,
    habit_id: HabitId,
    params: CreateStreakParams,
) -> Result<Streak, ServiceError> {
    create_streak_on(store, user_id, habit_id, params, Utc::now().date_naive())
}

/// Date-explicit variant of [`create_streak`] used by tests and backfills
pub fn create_streak_on<S: HabitStore + StreakStore>(
    store: &S,
    user_id: UserId,
    habit_id: HabitId,
    params: CreateStreakParams,
    today: NaiveDate,
) -> Result<Streak, ServiceError> {
    let habit = owned_habit(store, user_id, habit_id)?;

    if store.find_active_streak(habit.id)?.is_some() {
        return Err(ServiceError::ActiveStreakExists);
    }

    if params.target_days <= 0 {
        return Err(ServiceError::InvalidTargetDays {
            target_days: params.target_days,
        });
    }

    let streak = Streak::start(habit.id, params.target_days, today);
    store.create_streak(&streak)?;

    tracing::info!(
        "Started streak {} for habit {} (target {} days)",
        streak.id,
        habit.id,
        streak.target_days
    );
    Ok(streak)
}

/// All streak attempts ever made for a habit, completed and active alike
pub fn list_streaks<S: HabitStore + StreakStore>(
    store: &S,
    user_id: UserId,
    habit_id: HabitId,
) -> Result<Vec<Streak>, ServiceError> {
    let habit = owned_habit(store, user_id, habit_id)?;
    Ok(store.find_streaks_by_habit(habit.id)?)
}

/// The habit's active streak with its check-ins
pub fn current_streak<S: HabitStore + StreakStore + CheckInStore>(
    store: &S,
    user_id: UserId,
    habit_id: HabitId,
) -> Result<StreakDetails, ServiceError> {
    let habit = owned_habit(store, user_id, habit_id)?;

    let streak = store
        .find_active_streak(habit.id)?
        .ok_or(ServiceError::NoActiveStreak)?;

    let check_ins = store.find_check_ins_by_streak(streak.id)?;

    Ok(StreakDetails { streak, check_ins })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{StreakStatus, User};
    use crate::service::habit::{create_habit, CreateHabitParams};
    use crate::storage::{MemoryStore, UserStore};

    fn setup() -> (MemoryStore, UserId, HabitId) {
        let store = MemoryStore::new();
        let user = User::new("runner@example.com".to_string(), "Runner".to_string()).unwrap();
        store.create_user(&user).unwrap();
        let habit = create_habit(
            &store,
            user.id,
            CreateHabitParams {
                name: "Run".to_string(),
                description: None,
                color: None,
                icon: None,
            },
        )
        .unwrap();
        (store, user.id, habit.id)
    }

    #[test]
    fn test_create_streak_starts_active_at_zero() {
        let (store, user_id, habit_id) = setup();

        let streak =
            create_streak(&store, user_id, habit_id, CreateStreakParams { target_days: 7 })
                .unwrap();

        assert_eq!(streak.status, StreakStatus::Active);
        assert_eq!(streak.current_streak, 0);
        assert_eq!(streak.target_days, 7);
    }

    #[test]
    fn test_second_active_streak_rejected() {
        let (store, user_id, habit_id) = setup();

        create_streak(&store, user_id, habit_id, CreateStreakParams { target_days: 7 }).unwrap();
        let result =
            create_streak(&store, user_id, habit_id, CreateStreakParams { target_days: 3 });

        assert!(matches!(result, Err(ServiceError::ActiveStreakExists)));
    }

    #[test]
    fn test_non_positive_target_rejected() {
        let (store, user_id, habit_id) = setup();

        for target_days in [0, -5] {
            let result =
                create_streak(&store, user_id, habit_id, CreateStreakParams { target_days });
            assert!(matches!(
                result,
                Err(ServiceError::InvalidTargetDays { .. })
            ));
        }
    }

    #[test]
    fn test_unknown_habit_rejected() {
        let (store, user_id, _) = setup();

        let result = create_streak(
            &store,
            user_id,
            HabitId::new(),
            CreateStreakParams { target_days: 7 },
        );
        assert!(matches!(result, Err(ServiceError::HabitNotFound)));
    }

    #[test]
    fn test_current_streak_requires_active() {
        let (store, user_id, habit_id) = setup();

        let result = current_streak(&store, user_id, habit_id);
        assert!(matches!(result, Err(ServiceError::NoActiveStreak)));

        create_streak(&store, user_id, habit_id, CreateStreakParams { target_days: 7 }).unwrap();
        let details = current_streak(&store, user_id, habit_id).unwrap();
        assert!(details.check_ins.is_empty());
    }
}
