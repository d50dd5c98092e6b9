/// Streak entity: one bounded attempt to check in daily until a target is met
///
/// A streak belongs to a habit and owns the check-ins recorded against it.
/// The service layer enforces the lifecycle rules (one active streak per
/// habit, consecutive days, destructive repair on a missed day); this entity
/// only carries the state and the transitions that touch its own fields.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{HabitId, StreakId, StreakStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Streak {
    /// Unique identifier for this streak
    pub id: StreakId,
    /// The habit this streak attempt belongs to
    pub habit_id: HabitId,
    /// How many consecutive days complete this streak (always > 0)
    pub target_days: i32,
    /// Consecutive days checked in so far; never exceeds target_days while active
    pub current_streak: i32,
    /// High-water mark of current_streak over this record's life (monotonic)
    pub max_streak_achieved: i32,
    /// The day the attempt started (UTC, day granularity)
    pub start_date: NaiveDate,
    /// The most recent check-in day, None before the first check-in
    pub last_check_in_date: Option<NaiveDate>,
    /// Lifecycle state; active until completed or invalidated
    pub status: StreakStatus,
    /// Set on the day current_streak reached target_days
    pub completed_at: Option<NaiveDate>,
    /// Set when a streak is marked failed (no current engine path does this)
    pub failed_at: Option<NaiveDate>,
    /// When this record was created
    pub created_at: DateTime<Utc>,
}

impl Streak {
    /// Start a new active streak for a habit
    ///
    /// The caller validates target_days and the one-active-streak invariant
    /// before constructing.
    pub fn start(habit_id: HabitId, target_days: i32, start_date: NaiveDate) -> Self {
        Self {
            id: StreakId::new(),
            habit_id,
            target_days,
            current_streak: 0,
            max_streak_achieved: 0,
            start_date,
            last_check_in_date: None,
            status: StreakStatus::Active,
            completed_at: None,
            failed_at: None,
            created_at: Utc::now(),
        }
    }

    /// Create a streak from existing data (used when loading from the database)
    #[allow(clippy::too_many_arguments)]
    pub fn from_existing(
        id: StreakId,
        habit_id: HabitId,
        target_days: i32,
        current_streak: i32,
        max_streak_achieved: i32,
        start_date: NaiveDate,
        last_check_in_date: Option<NaiveDate>,
        status: StreakStatus,
        completed_at: Option<NaiveDate>,
        failed_at: Option<NaiveDate>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            habit_id,
            target_days,
            current_streak,
            max_streak_achieved,
            start_date,
            last_check_in_date,
            status,
            completed_at,
            failed_at,
            created_at,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == StreakStatus::Active
    }

    /// Advance the streak by one checked-in day
    pub fn record_check_in(&mut self, day: NaiveDate) {
        self.current_streak += 1;
        self.last_check_in_date = Some(day);
    }

    /// Whether the streak has accumulated enough days to complete
    pub fn target_reached(&self) -> bool {
        self.current_streak >= self.target_days
    }

    /// Transition to completed; terminal
    pub fn complete(&mut self, day: NaiveDate) {
        self.status = StreakStatus::Completed;
        self.completed_at = Some(day);
    }

    /// Raise the high-water mark if the current run surpassed it
    pub fn update_max_streak(&mut self) {
        if self.current_streak > self.max_streak_achieved {
            self.max_streak_achieved = self.current_streak;
        }
    }

    /// Days remaining until the target, zero when met or exceeded
    pub fn days_remaining(&self) -> i32 {
        (self.target_days - self.current_streak).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, n).unwrap()
    }

    #[test]
    fn test_start_is_active_and_empty() {
        let streak = Streak::start(HabitId::new(), 7, day(1));
        assert!(streak.is_active());
        assert_eq!(streak.current_streak, 0);
        assert_eq!(streak.max_streak_achieved, 0);
        assert_eq!(streak.last_check_in_date, None);
        assert_eq!(streak.days_remaining(), 7);
    }

    #[test]
    fn test_record_check_in_advances() {
        let mut streak = Streak::start(HabitId::new(), 3, day(1));
        streak.record_check_in(day(1));
        streak.update_max_streak();

        assert_eq!(streak.current_streak, 1);
        assert_eq!(streak.max_streak_achieved, 1);
        assert_eq!(streak.last_check_in_date, Some(day(1)));
        assert!(!streak.target_reached());
    }

    #[test]
    fn test_complete_is_terminal_state() {
        let mut streak = Streak::start(HabitId::new(), 2, day(1));
        streak.record_check_in(day(1));
        streak.record_check_in(day(2));
        assert!(streak.target_reached());

        streak.complete(day(2));
        assert_eq!(streak.status, StreakStatus::Completed);
        assert_eq!(streak.completed_at, Some(day(2)));
        assert!(!streak.is_active());
    }

    #[test]
    fn test_max_streak_is_monotonic() {
        let mut streak = Streak::start(HabitId::new(), 10, day(1));
        streak.record_check_in(day(1));
        streak.update_max_streak();
        assert_eq!(streak.max_streak_achieved, 1);

        // Resetting the current run never lowers the high-water mark
        streak.current_streak = 0;
        streak.update_max_streak();
        assert_eq!(streak.max_streak_achieved, 1);
    }
}
