/// In-memory storage backend
///
/// A RefCell-backed fake implementing every store trait, so the streak and
/// analytics engines can be exercised without a database. Semantics mirror
/// the SQLite backend: habit deletion is soft, find_* excludes deleted
/// habits, ordering matches the SQL ORDER BY clauses.

use std::cell::RefCell;
use std::collections::HashMap;

use chrono::NaiveDate;

use crate::domain::{
    Achievement, AchievementId, CheckIn, CheckInId, Habit, HabitId, Streak, StreakId,
    StreakStatus, User, UserId,
};
use crate::storage::{
    AchievementStore, CheckInStore, HabitStore, StorageError, StreakStore, UserStore,
};

#[derive(Default)]
pub struct MemoryStore {
    users: RefCell<Vec<User>>,
    habits: RefCell<Vec<Habit>>,
    deleted_habits: RefCell<HashMap<HabitId, ()>>,
    streaks: RefCell<Vec<Streak>>,
    check_ins: RefCell<Vec<CheckIn>>,
    achievements: RefCell<Vec<Achievement>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn habit_visible(&self, id: HabitId) -> bool {
        !self.deleted_habits.borrow().contains_key(&id)
    }
}

impl UserStore for MemoryStore {
    fn create_user(&self, user: &User) -> Result<(), StorageError> {
        self.users.borrow_mut().push(user.clone());
        Ok(())
    }

    fn find_user(&self, id: UserId) -> Result<Option<User>, StorageError> {
        Ok(self.users.borrow().iter().find(|u| u.id == id).cloned())
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        Ok(self.users.borrow().iter().find(|u| u.email == email).cloned())
    }

    fn list_users(&self) -> Result<Vec<User>, StorageError> {
        Ok(self.users.borrow().clone())
    }

    fn update_user(&self, user: &User) -> Result<(), StorageError> {
        let mut users = self.users.borrow_mut();
        if let Some(existing) = users.iter_mut().find(|u| u.id == user.id) {
            *existing = user.clone();
        }
        Ok(())
    }

    fn delete_user(&self, id: UserId) -> Result<(), StorageError> {
        self.users.borrow_mut().retain(|u| u.id != id);
        Ok(())
    }
}

impl HabitStore for MemoryStore {
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        self.habits.borrow_mut().push(habit.clone());
        Ok(())
    }

    fn find_habit(&self, id: HabitId) -> Result<Option<Habit>, StorageError> {
        if !self.habit_visible(id) {
            return Ok(None);
        }
        Ok(self.habits.borrow().iter().find(|h| h.id == id).cloned())
    }

    fn find_habits_by_user(&self, user_id: UserId) -> Result<Vec<Habit>, StorageError> {
        Ok(self
            .habits
            .borrow()
            .iter()
            .filter(|h| h.user_id == user_id && self.habit_visible(h.id))
            .cloned()
            .collect())
    }

    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let mut habits = self.habits.borrow_mut();
        if let Some(existing) = habits.iter_mut().find(|h| h.id == habit.id) {
            *existing = habit.clone();
        }
        Ok(())
    }

    fn delete_habit(&self, id: HabitId) -> Result<(), StorageError> {
        self.deleted_habits.borrow_mut().insert(id, ());
        Ok(())
    }
}

impl StreakStore for MemoryStore {
    fn create_streak(&self, streak: &Streak) -> Result<(), StorageError> {
        self.streaks.borrow_mut().push(streak.clone());
        Ok(())
    }

    fn find_streak(&self, id: StreakId) -> Result<Option<Streak>, StorageError> {
        Ok(self.streaks.borrow().iter().find(|s| s.id == id).cloned())
    }

    fn find_streaks_by_habit(&self, habit_id: HabitId) -> Result<Vec<Streak>, StorageError> {
        Ok(self
            .streaks
            .borrow()
            .iter()
            .filter(|s| s.habit_id == habit_id)
            .cloned()
            .collect())
    }

    fn find_active_streak(&self, habit_id: HabitId) -> Result<Option<Streak>, StorageError> {
        Ok(self
            .streaks
            .borrow()
            .iter()
            .find(|s| s.habit_id == habit_id && s.status == StreakStatus::Active)
            .cloned())
    }

    fn update_streak(&self, streak: &Streak) -> Result<(), StorageError> {
        let mut streaks = self.streaks.borrow_mut();
        if let Some(existing) = streaks.iter_mut().find(|s| s.id == streak.id) {
            *existing = streak.clone();
        }
        Ok(())
    }

    fn delete_streak(&self, id: StreakId) -> Result<(), StorageError> {
        self.streaks.borrow_mut().retain(|s| s.id != id);
        Ok(())
    }
}

impl CheckInStore for MemoryStore {
    fn create_check_in(&self, check_in: &CheckIn) -> Result<(), StorageError> {
        self.check_ins.borrow_mut().push(check_in.clone());
        Ok(())
    }

    fn find_check_in(&self, id: CheckInId) -> Result<Option<CheckIn>, StorageError> {
        Ok(self.check_ins.borrow().iter().find(|c| c.id == id).cloned())
    }

    fn find_check_ins_by_streak(&self, streak_id: StreakId) -> Result<Vec<CheckIn>, StorageError> {
        let mut result: Vec<CheckIn> = self
            .check_ins
            .borrow()
            .iter()
            .filter(|c| c.streak_id == streak_id)
            .cloned()
            .collect();
        result.sort_by_key(|c| c.check_in_date);
        Ok(result)
    }

    fn find_check_in_by_date(
        &self,
        streak_id: StreakId,
        date: NaiveDate,
    ) -> Result<Option<CheckIn>, StorageError> {
        Ok(self
            .check_ins
            .borrow()
            .iter()
            .find(|c| c.streak_id == streak_id && c.check_in_date == date)
            .cloned())
    }

    fn find_latest_check_in(&self, streak_id: StreakId) -> Result<Option<CheckIn>, StorageError> {
        Ok(self
            .check_ins
            .borrow()
            .iter()
            .filter(|c| c.streak_id == streak_id)
            .max_by_key(|c| c.check_in_date)
            .cloned())
    }

    fn delete_check_in(&self, id: CheckInId) -> Result<(), StorageError> {
        self.check_ins.borrow_mut().retain(|c| c.id != id);
        Ok(())
    }
}

impl AchievementStore for MemoryStore {
    fn create_achievement(&self, achievement: &Achievement) -> Result<(), StorageError> {
        self.achievements.borrow_mut().push(achievement.clone());
        Ok(())
    }

    fn find_achievement(&self, id: AchievementId) -> Result<Option<Achievement>, StorageError> {
        Ok(self
            .achievements
            .borrow()
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    fn find_achievements_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Achievement>, StorageError> {
        Ok(self
            .achievements
            .borrow()
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    fn find_achievements_by_habit(
        &self,
        habit_id: HabitId,
    ) -> Result<Vec<Achievement>, StorageError> {
        Ok(self
            .achievements
            .borrow()
            .iter()
            .filter(|a| a.habit_id == habit_id)
            .cloned()
            .collect())
    }

    fn delete_achievement(&self, id: AchievementId) -> Result<(), StorageError> {
        self.achievements.borrow_mut().retain(|a| a.id != id);
        Ok(())
    }
}
