/// User entity
///
/// Users own habits and receive achievements. Credential handling (password
/// hashing, token issuance) is the HTTP layer's concern; the core only needs
/// identity, a display name, and the join date for analytics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    /// When the account was created; analytics derives days_since_joined from this
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with validation
    pub fn new(email: String, name: String) -> Result<Self, DomainError> {
        Self::validate_email(&email)?;
        Self::validate_name(&name)?;

        Ok(Self {
            id: UserId::new(),
            email,
            name,
            created_at: Utc::now(),
        })
    }

    /// Create a user from existing data (used when loading from the database)
    pub fn from_existing(
        id: UserId,
        email: String,
        name: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            name,
            created_at,
        }
    }

    /// Rename the user with validation
    pub fn rename(&mut self, name: String) -> Result<(), DomainError> {
        Self::validate_name(&name)?;
        self.name = name;
        Ok(())
    }

    fn validate_email(email: &str) -> Result<(), DomainError> {
        let trimmed = email.trim();
        if trimmed.is_empty() || !trimmed.contains('@') {
            return Err(DomainError::InvalidEmail(format!(
                "'{}' is not a valid email address",
                email
            )));
        }
        Ok(())
    }

    fn validate_name(name: &str) -> Result<(), DomainError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::Validation {
                message: "Name cannot be empty".to_string(),
            });
        }
        if trimmed.len() > 100 {
            return Err(DomainError::Validation {
                message: "Name cannot be longer than 100 characters".to_string(),
            });
        }
        Ok(())
    }
}
