/// Habit management operations
///
/// Conventional CRUD over the habit store. Ownership checks report a missing
/// habit and a habit owned by someone else with the same error.

use serde::{Deserialize, Serialize};

use crate::domain::{Habit, HabitId, Streak, UserId};
use crate::service::ServiceError;
use crate::storage::{HabitStore, StreakStore};

/// Parameters for creating a habit
#[derive(Debug, Clone, Deserialize)]
pub struct CreateHabitParams {
    pub name: String,
    pub description: Option<String>,
    /// Hex color code like "#ff8800"
    pub color: Option<String>,
    pub icon: Option<String>,
}

/// Parameters for updating a habit
///
/// Doubly wrapped options distinguish "leave unchanged" (None) from
/// "clear the field" (Some(None)).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateHabitParams {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub color: Option<Option<String>>,
    pub icon: Option<Option<String>>,
    pub is_active: Option<bool>,
}

/// A habit together with its active streak, if any
#[derive(Debug, Clone, Serialize)]
pub struct HabitDetails {
    pub habit: Habit,
    pub current_streak: Option<Streak>,
}

/// Resolve a habit and verify the caller owns it
///
/// Used by every operation that takes a habit id. Absence and foreign
/// ownership are indistinguishable to the caller.
pub(crate) fn owned_habit<S: HabitStore>(
    store: &S,
    user_id: UserId,
    habit_id: HabitId,
) -> Result<Habit, ServiceError> {
    match store.find_habit(habit_id)? {
        Some(habit) if habit.user_id == user_id => Ok(habit),
        _ => Err(ServiceError::HabitNotFound),
    }
}

/// Create a new habit for the user
pub fn create_habit<S: HabitStore>(
    store: &S,
    user_id: UserId,
    params: CreateHabitParams,
) -> Result<Habit, ServiceError> {
    let habit = Habit::new(
        user_id,
        params.name,
        params.description,
        params.color,
        params.icon,
    )?;

    store.create_habit(&habit)?;

    tracing::info!("User {} created habit '{}'", user_id, habit.name);
    Ok(habit)
}

/// List the user's habits, each with its active streak attached
pub fn list_habits<S: HabitStore + StreakStore>(
    store: &S,
    user_id: UserId,
) -> Result<Vec<HabitDetails>, ServiceError> {
    let habits = store.find_habits_by_user(user_id)?;

    let mut details = Vec::with_capacity(habits.len());
    for habit in habits {
        let current_streak = store.find_active_streak(habit.id)?;
        details.push(HabitDetails {
            habit,
            current_streak,
        });
    }

    Ok(details)
}

/// Fetch one habit with its active streak
pub fn get_habit<S: HabitStore + StreakStore>(
    store: &S,
    user_id: UserId,
    habit_id: HabitId,
) -> Result<HabitDetails, ServiceError> {
    let habit = owned_habit(store, user_id, habit_id)?;
    let current_streak = store.find_active_streak(habit.id)?;

    Ok(HabitDetails {
        habit,
        current_streak,
    })
}

/// Update a habit's properties
pub fn update_habit<S: HabitStore>(
    store: &S,
    user_id: UserId,
    habit_id: HabitId,
    params: UpdateHabitParams,
) -> Result<Habit, ServiceError> {
    let mut habit = owned_habit(store, user_id, habit_id)?;

    habit.update(
        params.name,
        params.description,
        params.color,
        params.icon,
        params.is_active,
    )?;

    store.update_habit(&habit)?;
    Ok(habit)
}

/// Soft-delete a habit; its history stays in storage but no lookup returns it
pub fn delete_habit<S: HabitStore>(
    store: &S,
    user_id: UserId,
    habit_id: HabitId,
) -> Result<(), ServiceError> {
    let habit = owned_habit(store, user_id, habit_id)?;

    store.delete_habit(habit.id)?;

    tracing::info!("User {} deleted habit '{}'", user_id, habit.name);
    Ok(())
}
