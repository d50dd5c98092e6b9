/// Habit entity and related functionality
///
/// This module defines the core Habit struct that represents a recurring
/// behavior a user wants to track, along with its validation rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, HabitId, UserId};

/// A habit represents something the user wants to do every day
///
/// Habits are owned by a user and act as the anchor for streak attempts.
/// A habit can be paused (is_active = false) without losing its history;
/// removal is a soft delete handled by the storage layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier for this habit
    pub id: HabitId,
    /// The user who owns this habit
    pub user_id: UserId,
    /// Display name (e.g., "Morning Run", "Read for 30min")
    pub name: String,
    /// Optional detailed description
    pub description: Option<String>,
    /// Optional hex color code for the client UI (e.g., "#ff8800")
    pub color: Option<String>,
    /// Optional icon identifier for the client UI
    pub icon: Option<String>,
    /// Whether this habit is currently active (can be paused)
    pub is_active: bool,
    /// When this habit was created
    pub created_at: DateTime<Utc>,
}

impl Habit {
    /// Create a new habit with validation
    pub fn new(
        user_id: UserId,
        name: String,
        description: Option<String>,
        color: Option<String>,
        icon: Option<String>,
    ) -> Result<Self, DomainError> {
        Self::validate_name(&name)?;
        Self::validate_description(&description)?;
        Self::validate_color(&color)?;
        Self::validate_icon(&icon)?;

        Ok(Self {
            id: HabitId::new(),
            user_id,
            name,
            description,
            color,
            icon,
            is_active: true,
            created_at: Utc::now(),
        })
    }

    /// Create a habit from existing data (used when loading from the database)
    ///
    /// This constructor assumes data is already validated and is mainly used
    /// by the storage layer when loading habits from the database.
    #[allow(clippy::too_many_arguments)]
    pub fn from_existing(
        id: HabitId,
        user_id: UserId,
        name: String,
        description: Option<String>,
        color: Option<String>,
        icon: Option<String>,
        is_active: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            name,
            description,
            color,
            icon,
            is_active,
            created_at,
        }
    }

    /// Update the habit's properties with validation
    ///
    /// Fields wrapped in Option are left untouched when None; the doubly
    /// wrapped ones allow clearing an optional field with Some(None).
    pub fn update(
        &mut self,
        name: Option<String>,
        description: Option<Option<String>>,
        color: Option<Option<String>>,
        icon: Option<Option<String>>,
        is_active: Option<bool>,
    ) -> Result<(), DomainError> {
        if let Some(ref new_name) = name {
            Self::validate_name(new_name)?;
        }
        if let Some(ref new_desc) = description {
            Self::validate_description(new_desc)?;
        }
        if let Some(ref new_color) = color {
            Self::validate_color(new_color)?;
        }
        if let Some(ref new_icon) = icon {
            Self::validate_icon(new_icon)?;
        }

        if let Some(new_name) = name {
            self.name = new_name;
        }
        if let Some(new_description) = description {
            self.description = new_description;
        }
        if let Some(new_color) = color {
            self.color = new_color;
        }
        if let Some(new_icon) = icon {
            self.icon = new_icon;
        }
        if let Some(new_is_active) = is_active {
            self.is_active = new_is_active;
        }

        Ok(())
    }

    // Validation helper methods

    fn validate_name(name: &str) -> Result<(), DomainError> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be empty".to_string(),
            ));
        }

        if trimmed.len() > 100 {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be longer than 100 characters".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_description(description: &Option<String>) -> Result<(), DomainError> {
        if let Some(desc) = description {
            if desc.len() > 500 {
                return Err(DomainError::Validation {
                    message: "Description cannot be longer than 500 characters".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Colors are 7-character hex codes like "#1a2b3c"
    fn validate_color(color: &Option<String>) -> Result<(), DomainError> {
        if let Some(c) = color {
            let valid = c.len() == 7
                && c.starts_with('#')
                && c[1..].chars().all(|ch| ch.is_ascii_hexdigit());
            if !valid {
                return Err(DomainError::InvalidColor(format!(
                    "'{}' is not a hex color code like #1a2b3c",
                    c
                )));
            }
        }
        Ok(())
    }

    fn validate_icon(icon: &Option<String>) -> Result<(), DomainError> {
        if let Some(i) = icon {
            if i.len() > 50 {
                return Err(DomainError::Validation {
                    message: "Icon identifier cannot be longer than 50 characters".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> UserId {
        UserId::new()
    }

    #[test]
    fn test_create_valid_habit() {
        let habit = Habit::new(
            owner(),
            "Morning Run".to_string(),
            Some("30-minute jog around the neighborhood".to_string()),
            Some("#ff8800".to_string()),
            Some("runner".to_string()),
        );

        assert!(habit.is_ok());
        let habit = habit.unwrap();
        assert_eq!(habit.name, "Morning Run");
        assert!(habit.is_active);
    }

    #[test]
    fn test_invalid_habit_name() {
        let result = Habit::new(owner(), "".to_string(), None, None, None);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_color() {
        let result = Habit::new(
            owner(),
            "Test Habit".to_string(),
            None,
            Some("orange".to_string()),
            None,
        );
        assert!(result.is_err());

        let result = Habit::new(
            owner(),
            "Test Habit".to_string(),
            None,
            Some("#zzzzzz".to_string()),
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_update_can_pause_and_clear_fields() {
        let mut habit = Habit::new(
            owner(),
            "Read".to_string(),
            Some("20 pages".to_string()),
            None,
            None,
        )
        .unwrap();

        habit
            .update(None, Some(None), None, None, Some(false))
            .unwrap();

        assert_eq!(habit.description, None);
        assert!(!habit.is_active);
        assert_eq!(habit.name, "Read");
    }
}
