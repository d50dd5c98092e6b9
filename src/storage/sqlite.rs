/// SQLite implementation of the storage interfaces
///
/// This module provides the concrete SQLite backend for users, habits,
/// streaks, check-ins, and achievements. Dates are stored as ISO-8601 text;
/// identifiers as UUID strings. Habit deletion is a soft delete via the
/// deleted_at column, which every habit lookup excludes.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::{
    Achievement, AchievementId, AchievementType, CheckIn, CheckInId, Habit, HabitId, Streak,
    StreakId, StreakStatus, User, UserId,
};
use crate::storage::{
    migrations, AchievementStore, CheckInStore, HabitStore, StorageError, StreakStore, UserStore,
};

/// SQLite-based storage backend
///
/// Holds a connection to the database and implements every per-entity
/// store trait against it.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Open the database file and run any pending migrations
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&conn)?;

        tracing::info!("SQLite storage initialized at: {:?}", db_path);

        Ok(Self { conn })
    }

    /// In-memory database, mainly for tests
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;
        migrations::initialize_database(&conn)?;
        Ok(Self { conn })
    }

    fn invalid_text(index: usize, message: &str) -> rusqlite::Error {
        rusqlite::Error::InvalidColumnType(index, message.to_string(), rusqlite::types::Type::Text)
    }

    fn row_to_user(row: &Row<'_>) -> Result<User, rusqlite::Error> {
        let id_str: String = row.get(0)?;
        let id = UserId::from_string(&id_str)
            .map_err(|_| Self::invalid_text(0, "Invalid UUID"))?;

        Ok(User::from_existing(
            id,
            row.get(1)?, // email
            row.get(2)?, // name
            row.get::<_, DateTime<Utc>>(3)?,
        ))
    }

    fn row_to_habit(row: &Row<'_>) -> Result<Habit, rusqlite::Error> {
        let id_str: String = row.get(0)?;
        let id = HabitId::from_string(&id_str)
            .map_err(|_| Self::invalid_text(0, "Invalid UUID"))?;

        let user_id_str: String = row.get(1)?;
        let user_id = UserId::from_string(&user_id_str)
            .map_err(|_| Self::invalid_text(1, "Invalid UUID"))?;

        Ok(Habit::from_existing(
            id,
            user_id,
            row.get(2)?, // name
            row.get(3)?, // description
            row.get(4)?, // color
            row.get(5)?, // icon
            row.get(6)?, // is_active
            row.get::<_, DateTime<Utc>>(7)?,
        ))
    }

    fn row_to_streak(row: &Row<'_>) -> Result<Streak, rusqlite::Error> {
        let id_str: String = row.get(0)?;
        let id = StreakId::from_string(&id_str)
            .map_err(|_| Self::invalid_text(0, "Invalid UUID"))?;

        let habit_id_str: String = row.get(1)?;
        let habit_id = HabitId::from_string(&habit_id_str)
            .map_err(|_| Self::invalid_text(1, "Invalid UUID"))?;

        let status_str: String = row.get(7)?;
        let status = StreakStatus::parse(&status_str)
            .ok_or_else(|| Self::invalid_text(7, "Invalid streak status"))?;

        Ok(Streak::from_existing(
            id,
            habit_id,
            row.get(2)?, // target_days
            row.get(3)?, // current_streak
            row.get(4)?, // max_streak_achieved
            row.get::<_, NaiveDate>(5)?,
            row.get::<_, Option<NaiveDate>>(6)?,
            status,
            row.get::<_, Option<NaiveDate>>(8)?,
            row.get::<_, Option<NaiveDate>>(9)?,
            row.get::<_, DateTime<Utc>>(10)?,
        ))
    }

    fn row_to_check_in(row: &Row<'_>) -> Result<CheckIn, rusqlite::Error> {
        let id_str: String = row.get(0)?;
        let id = CheckInId::from_string(&id_str)
            .map_err(|_| Self::invalid_text(0, "Invalid UUID"))?;

        let streak_id_str: String = row.get(1)?;
        let streak_id = StreakId::from_string(&streak_id_str)
            .map_err(|_| Self::invalid_text(1, "Invalid UUID"))?;

        Ok(CheckIn::from_existing(
            id,
            streak_id,
            row.get::<_, NaiveDate>(2)?,
            row.get::<_, DateTime<Utc>>(3)?,
            row.get(4)?, // notes
        ))
    }

    fn row_to_achievement(row: &Row<'_>) -> Result<Achievement, rusqlite::Error> {
        let id_str: String = row.get(0)?;
        let id = AchievementId::from_string(&id_str)
            .map_err(|_| Self::invalid_text(0, "Invalid UUID"))?;

        let user_id_str: String = row.get(1)?;
        let user_id = UserId::from_string(&user_id_str)
            .map_err(|_| Self::invalid_text(1, "Invalid UUID"))?;

        let habit_id_str: String = row.get(2)?;
        let habit_id = HabitId::from_string(&habit_id_str)
            .map_err(|_| Self::invalid_text(2, "Invalid UUID"))?;

        let type_str: String = row.get(3)?;
        let achievement_type = AchievementType::parse(&type_str);

        let metadata_str: Option<String> = row.get(6)?;
        let metadata = match metadata_str {
            Some(s) => serde_json::from_str(&s)
                .map_err(|_| Self::invalid_text(6, "Invalid metadata JSON"))?,
            None => serde_json::Value::Null,
        };

        Ok(Achievement::from_existing(
            id,
            user_id,
            habit_id,
            achievement_type,
            row.get(4)?, // target_days
            row.get::<_, DateTime<Utc>>(5)?,
            metadata,
        ))
    }
}

impl UserStore for SqliteStorage {
    fn create_user(&self, user: &User) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO users (id, email, name, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![user.id.to_string(), user.email, user.name, user.created_at],
        )?;

        tracing::debug!("Created user: {} ({})", user.email, user.id);
        Ok(())
    }

    fn find_user(&self, id: UserId) -> Result<Option<User>, StorageError> {
        let user = self
            .conn
            .query_row(
                "SELECT id, email, name, created_at FROM users WHERE id = ?1",
                params![id.to_string()],
                Self::row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let user = self
            .conn
            .query_row(
                "SELECT id, email, name, created_at FROM users WHERE email = ?1",
                params![email],
                Self::row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    fn list_users(&self) -> Result<Vec<User>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, email, name, created_at FROM users ORDER BY created_at ASC",
        )?;

        let user_iter = stmt.query_map([], Self::row_to_user)?;

        let mut users = Vec::new();
        for user in user_iter {
            users.push(user?);
        }

        Ok(users)
    }

    fn update_user(&self, user: &User) -> Result<(), StorageError> {
        self.conn.execute(
            "UPDATE users SET email = ?2, name = ?3 WHERE id = ?1",
            params![user.id.to_string(), user.email, user.name],
        )?;
        Ok(())
    }

    fn delete_user(&self, id: UserId) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM users WHERE id = ?1", params![id.to_string()])?;
        Ok(())
    }
}

impl HabitStore for SqliteStorage {
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO habits (id, user_id, name, description, color, icon, is_active, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                habit.id.to_string(),
                habit.user_id.to_string(),
                habit.name,
                habit.description,
                habit.color,
                habit.icon,
                habit.is_active,
                habit.created_at,
            ],
        )?;

        tracing::debug!("Created habit: {} ({})", habit.name, habit.id);
        Ok(())
    }

    fn find_habit(&self, id: HabitId) -> Result<Option<Habit>, StorageError> {
        let habit = self
            .conn
            .query_row(
                "SELECT id, user_id, name, description, color, icon, is_active, created_at
                 FROM habits WHERE id = ?1 AND deleted_at IS NULL",
                params![id.to_string()],
                Self::row_to_habit,
            )
            .optional()?;
        Ok(habit)
    }

    fn find_habits_by_user(&self, user_id: UserId) -> Result<Vec<Habit>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, name, description, color, icon, is_active, created_at
             FROM habits WHERE user_id = ?1 AND deleted_at IS NULL
             ORDER BY created_at ASC",
        )?;

        let habit_iter = stmt.query_map(params![user_id.to_string()], Self::row_to_habit)?;

        let mut habits = Vec::new();
        for habit in habit_iter {
            habits.push(habit?);
        }

        Ok(habits)
    }

    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        self.conn.execute(
            "UPDATE habits SET name = ?2, description = ?3, color = ?4, icon = ?5, is_active = ?6
             WHERE id = ?1 AND deleted_at IS NULL",
            params![
                habit.id.to_string(),
                habit.name,
                habit.description,
                habit.color,
                habit.icon,
                habit.is_active,
            ],
        )?;

        tracing::debug!("Updated habit: {} ({})", habit.name, habit.id);
        Ok(())
    }

    /// Soft delete: the row stays but no lookup returns it again
    fn delete_habit(&self, id: HabitId) -> Result<(), StorageError> {
        self.conn.execute(
            "UPDATE habits SET deleted_at = ?2 WHERE id = ?1 AND deleted_at IS NULL",
            params![id.to_string(), Utc::now()],
        )?;

        tracing::debug!("Soft deleted habit: {}", id);
        Ok(())
    }
}

impl StreakStore for SqliteStorage {
    fn create_streak(&self, streak: &Streak) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO habit_streaks (id, habit_id, target_days, current_streak,
                max_streak_achieved, start_date, last_check_in_date, status,
                completed_at, failed_at, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                streak.id.to_string(),
                streak.habit_id.to_string(),
                streak.target_days,
                streak.current_streak,
                streak.max_streak_achieved,
                streak.start_date,
                streak.last_check_in_date,
                streak.status.as_str(),
                streak.completed_at,
                streak.failed_at,
                streak.created_at,
            ],
        )?;

        tracing::debug!("Created streak {} for habit {}", streak.id, streak.habit_id);
        Ok(())
    }

    fn find_streak(&self, id: StreakId) -> Result<Option<Streak>, StorageError> {
        let streak = self
            .conn
            .query_row(
                "SELECT id, habit_id, target_days, current_streak, max_streak_achieved,
                        start_date, last_check_in_date, status, completed_at, failed_at, created_at
                 FROM habit_streaks WHERE id = ?1",
                params![id.to_string()],
                Self::row_to_streak,
            )
            .optional()?;
        Ok(streak)
    }

    fn find_streaks_by_habit(&self, habit_id: HabitId) -> Result<Vec<Streak>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, habit_id, target_days, current_streak, max_streak_achieved,
                    start_date, last_check_in_date, status, completed_at, failed_at, created_at
             FROM habit_streaks WHERE habit_id = ?1
             ORDER BY created_at ASC",
        )?;

        let streak_iter = stmt.query_map(params![habit_id.to_string()], Self::row_to_streak)?;

        let mut streaks = Vec::new();
        for streak in streak_iter {
            streaks.push(streak?);
        }

        Ok(streaks)
    }

    fn find_active_streak(&self, habit_id: HabitId) -> Result<Option<Streak>, StorageError> {
        let streak = self
            .conn
            .query_row(
                "SELECT id, habit_id, target_days, current_streak, max_streak_achieved,
                        start_date, last_check_in_date, status, completed_at, failed_at, created_at
                 FROM habit_streaks WHERE habit_id = ?1 AND status = 'active'
                 LIMIT 1",
                params![habit_id.to_string()],
                Self::row_to_streak,
            )
            .optional()?;
        Ok(streak)
    }

    fn update_streak(&self, streak: &Streak) -> Result<(), StorageError> {
        self.conn.execute(
            "UPDATE habit_streaks SET current_streak = ?2, max_streak_achieved = ?3,
                last_check_in_date = ?4, status = ?5, completed_at = ?6, failed_at = ?7
             WHERE id = ?1",
            params![
                streak.id.to_string(),
                streak.current_streak,
                streak.max_streak_achieved,
                streak.last_check_in_date,
                streak.status.as_str(),
                streak.completed_at,
                streak.failed_at,
            ],
        )?;

        tracing::debug!("Updated streak: {}", streak.id);
        Ok(())
    }

    fn delete_streak(&self, id: StreakId) -> Result<(), StorageError> {
        self.conn.execute(
            "DELETE FROM habit_streaks WHERE id = ?1",
            params![id.to_string()],
        )?;

        tracing::debug!("Deleted streak: {}", id);
        Ok(())
    }
}

impl CheckInStore for SqliteStorage {
    fn create_check_in(&self, check_in: &CheckIn) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO habit_checkins (id, streak_id, check_in_date, checked_in_at, notes)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                check_in.id.to_string(),
                check_in.streak_id.to_string(),
                check_in.check_in_date,
                check_in.checked_in_at,
                check_in.notes,
            ],
        )?;

        tracing::debug!(
            "Created check-in {} for streak {} on {}",
            check_in.id,
            check_in.streak_id,
            check_in.check_in_date
        );
        Ok(())
    }

    fn find_check_in(&self, id: CheckInId) -> Result<Option<CheckIn>, StorageError> {
        let check_in = self
            .conn
            .query_row(
                "SELECT id, streak_id, check_in_date, checked_in_at, notes
                 FROM habit_checkins WHERE id = ?1",
                params![id.to_string()],
                Self::row_to_check_in,
            )
            .optional()?;
        Ok(check_in)
    }

    fn find_check_ins_by_streak(&self, streak_id: StreakId) -> Result<Vec<CheckIn>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, streak_id, check_in_date, checked_in_at, notes
             FROM habit_checkins WHERE streak_id = ?1
             ORDER BY check_in_date ASC",
        )?;

        let check_in_iter = stmt.query_map(params![streak_id.to_string()], Self::row_to_check_in)?;

        let mut check_ins = Vec::new();
        for check_in in check_in_iter {
            check_ins.push(check_in?);
        }

        Ok(check_ins)
    }

    fn find_check_in_by_date(
        &self,
        streak_id: StreakId,
        date: NaiveDate,
    ) -> Result<Option<CheckIn>, StorageError> {
        let check_in = self
            .conn
            .query_row(
                "SELECT id, streak_id, check_in_date, checked_in_at, notes
                 FROM habit_checkins WHERE streak_id = ?1 AND check_in_date = ?2",
                params![streak_id.to_string(), date],
                Self::row_to_check_in,
            )
            .optional()?;
        Ok(check_in)
    }

    fn find_latest_check_in(&self, streak_id: StreakId) -> Result<Option<CheckIn>, StorageError> {
        let check_in = self
            .conn
            .query_row(
                "SELECT id, streak_id, check_in_date, checked_in_at, notes
                 FROM habit_checkins WHERE streak_id = ?1
                 ORDER BY check_in_date DESC LIMIT 1",
                params![streak_id.to_string()],
                Self::row_to_check_in,
            )
            .optional()?;
        Ok(check_in)
    }

    fn delete_check_in(&self, id: CheckInId) -> Result<(), StorageError> {
        self.conn.execute(
            "DELETE FROM habit_checkins WHERE id = ?1",
            params![id.to_string()],
        )?;
        Ok(())
    }
}

impl AchievementStore for SqliteStorage {
    fn create_achievement(&self, achievement: &Achievement) -> Result<(), StorageError> {
        let metadata_json = serde_json::to_string(&achievement.metadata)?;

        self.conn.execute(
            "INSERT INTO achievements (id, user_id, habit_id, achievement_type,
                target_days, achieved_at, metadata)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                achievement.id.to_string(),
                achievement.user_id.to_string(),
                achievement.habit_id.to_string(),
                achievement.achievement_type.as_str(),
                achievement.target_days,
                achievement.achieved_at,
                metadata_json,
            ],
        )?;

        tracing::debug!(
            "Created achievement {} ({}) for habit {}",
            achievement.id,
            achievement.achievement_type.as_str(),
            achievement.habit_id
        );
        Ok(())
    }

    fn find_achievement(&self, id: AchievementId) -> Result<Option<Achievement>, StorageError> {
        let achievement = self
            .conn
            .query_row(
                "SELECT id, user_id, habit_id, achievement_type, target_days, achieved_at, metadata
                 FROM achievements WHERE id = ?1",
                params![id.to_string()],
                Self::row_to_achievement,
            )
            .optional()?;
        Ok(achievement)
    }

    fn find_achievements_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Achievement>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, habit_id, achievement_type, target_days, achieved_at, metadata
             FROM achievements WHERE user_id = ?1
             ORDER BY achieved_at ASC",
        )?;

        let iter = stmt.query_map(params![user_id.to_string()], Self::row_to_achievement)?;

        let mut achievements = Vec::new();
        for achievement in iter {
            achievements.push(achievement?);
        }

        Ok(achievements)
    }

    fn find_achievements_by_habit(
        &self,
        habit_id: HabitId,
    ) -> Result<Vec<Achievement>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, habit_id, achievement_type, target_days, achieved_at, metadata
             FROM achievements WHERE habit_id = ?1
             ORDER BY achieved_at ASC",
        )?;

        let iter = stmt.query_map(params![habit_id.to_string()], Self::row_to_achievement)?;

        let mut achievements = Vec::new();
        for achievement in iter {
            achievements.push(achievement?);
        }

        Ok(achievements)
    }

    fn delete_achievement(&self, id: AchievementId) -> Result<(), StorageError> {
        self.conn.execute(
            "DELETE FROM achievements WHERE id = ?1",
            params![id.to_string()],
        )?;
        Ok(())
    }
}
