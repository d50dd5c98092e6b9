/// User account operations
///
/// Only the pieces the tracker core needs: creating an account record and
/// renaming it. Credentials and token issuance live in the HTTP layer.

use serde::Deserialize;

use crate::domain::{User, UserId};
use crate::service::ServiceError;
use crate::storage::UserStore;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserParams {
    pub email: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfileParams {
    pub name: String,
}

/// Create a user account; emails are unique
pub fn create_user<S: UserStore>(store: &S, params: CreateUserParams) -> Result<User, ServiceError> {
    if store.find_user_by_email(&params.email)?.is_some() {
        return Err(ServiceError::EmailTaken);
    }

    let user = User::new(params.email, params.name)?;
    store.create_user(&user)?;

    tracing::info!("Created user {} ({})", user.email, user.id);
    Ok(user)
}

/// Rename the user
pub fn update_profile<S: UserStore>(
    store: &S,
    user_id: UserId,
    params: UpdateProfileParams,
) -> Result<User, ServiceError> {
    let mut user = store
        .find_user(user_id)?
        .ok_or(ServiceError::UserNotFound)?;

    user.rename(params.name)?;
    store.update_user(&user)?;

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_duplicate_email_rejected() {
        let store = MemoryStore::new();
        let params = CreateUserParams {
            email: "a@b.c".to_string(),
            name: "A".to_string(),
        };

        create_user(&store, params.clone()).unwrap();
        let result = create_user(&store, params);
        assert!(matches!(result, Err(ServiceError::EmailTaken)));
    }

    #[test]
    fn test_update_profile_renames() {
        let store = MemoryStore::new();
        let user = create_user(
            &store,
            CreateUserParams {
                email: "a@b.c".to_string(),
                name: "A".to_string(),
            },
        )
        .unwrap();

        let updated = update_profile(
            &store,
            user.id,
            UpdateProfileParams {
                name: "Ada".to_string(),
            },
        )
        .unwrap();
        assert_eq!(updated.name, "Ada");

        let missing = update_profile(
            &store,
            UserId::new(),
            UpdateProfileParams {
                name: "X".to_string(),
            },
        );
        assert!(matches!(missing, Err(ServiceError::UserNotFound)));
    }
}
