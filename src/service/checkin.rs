/// Daily check-in: the streak consistency state machine
///
/// A check-in either advances the habit's active streak by one day,
/// completes it when the target is reached, or - when a day was missed -
/// invalidates the whole attempt by deleting the streak and every check-in
/// it owns. The deletion path is a best-effort sequence of store calls with
/// no compensating rollback; a store failure mid-way can leave check-ins
/// removed with the streak row still present, which requires manual
/// reconciliation.

use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::domain::{CheckIn, HabitId, UserId};
use crate::service::{
    achievement::emit_streak_completed, habit::owned_habit, ServiceError,
};
use crate::storage::{AchievementStore, CheckInStore, HabitStore, StreakStore};

/// Parameters for a daily check-in
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckInParams {
    pub notes: Option<String>,
}

/// Check in for today on the habit's active streak
pub fn check_in<S>(
    store: &S,
    user_id: UserId,
    habit_id: HabitId,
    params: CheckInParams,
) -> Result<CheckIn, ServiceError>
where
    S: HabitStore + StreakStore + CheckInStore + AchievementStore,
{
    check_in_on(store, user_id, habit_id, params, Utc::now().date_naive())
}

/// Date-explicit variant of [`check_in`]; tests drive multi-day scenarios
/// through this
pub fn check_in_on<S>(
    store: &S,
    user_id: UserId,
    habit_id: HabitId,
    params: CheckInParams,
    today: NaiveDate,
) -> Result<CheckIn, ServiceError>
where
    S: HabitStore + StreakStore + CheckInStore + AchievementStore,
{
    let habit = owned_habit(store, user_id, habit_id)?;

    let mut streak = store
        .find_active_streak(habit.id)?
        .ok_or(ServiceError::NoActiveStreak)?;

    if store.find_check_in_by_date(streak.id, today)?.is_some() {
        return Err(ServiceError::AlreadyCheckedIn);
    }

    // A gap between the latest check-in and today breaks the attempt. The
    // streak and its history are removed outright rather than marked failed.
    if let Some(latest) = store.find_latest_check_in(streak.id)? {
        let yesterday = today - chrono::Duration::days(1);
        if latest.check_in_date != yesterday {
            for check_in in store.find_check_ins_by_streak(streak.id)? {
                store.delete_check_in(check_in.id)?;
            }
            store.delete_streak(streak.id)?;

            tracing::info!(
                "Streak {} broken for habit {}: last check-in {}, today {}",
                streak.id,
                habit.id,
                latest.check_in_date,
                today
            );
            return Err(ServiceError::StreakBroken);
        }
    }

    let check_in = CheckIn::new(streak.id, today, params.notes)?;
    store.create_check_in(&check_in)?;

    streak.record_check_in(today);

    if streak.target_reached() {
        streak.complete(today);
        emit_streak_completed(store, habit.user_id, habit.id, &streak)?;
    }

    streak.update_max_streak();
    store.update_streak(&streak)?;

    tracing::debug!(
        "Check-in recorded for habit {}: day {}/{}",
        habit.id,
        streak.current_streak,
        streak.target_days
    );
    Ok(check_in)
}

/// Every check-in across all of the habit's streak attempts
pub fn list_check_ins<S>(
    store: &S,
    user_id: UserId,
    habit_id: HabitId,
) -> Result<Vec<CheckIn>, ServiceError>
where
    S: HabitStore + StreakStore + CheckInStore,
{
    let habit = owned_habit(store, user_id, habit_id)?;

    let mut all_check_ins = Vec::new();
    for streak in store.find_streaks_by_habit(habit.id)? {
        all_check_ins.extend(store.find_check_ins_by_streak(streak.id)?);
    }

    Ok(all_check_ins)
}
