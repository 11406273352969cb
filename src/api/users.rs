//! User endpoint
//!
//! POST /user/ accepts a `UserIn` and answers with a `UserOut`. The handler
//! converts through `UserInDb`, so the plaintext password is hashed and then
//! dropped before anything is serialized.

use axum::{routing::post, Json, Router};

use crate::api::extract::ValidJson;
use crate::api::middleware::{ApiError, AppState};
use crate::models::{UserIn, UserInDb, UserOut};

pub fn router() -> Router<AppState> {
    Router::new().route("/user/", post(create_user))
}

/// Pretend to store the user. Nothing is persisted.
fn save_user(user: UserIn) -> Result<UserInDb, ApiError> {
    let stored = UserInDb::try_from(user).map_err(|e| {
        tracing::error!("Failed to hash password: {:#}", e);
        ApiError::internal_error("Failed to store user")
    })?;
    tracing::info!(username = %stored.username, "User saved (not persisted)");
    Ok(stored)
}

/// POST /user/
async fn create_user(ValidJson(user): ValidJson<UserIn>) -> Result<Json<UserOut>, ApiError> {
    Ok(Json(UserOut::from(save_user(user)?)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_user_stores_argon2_hash() {
        let user = UserIn {
            username: "alice".to_string(),
            password: "wonderland".to_string(),
            email: "alice@example.com".to_string(),
            full_name: None,
        };

        let stored = save_user(user).unwrap();

        assert_eq!(stored.username, "alice");
        assert!(stored.hashed_password.starts_with("$argon2id$"));
        assert!(!stored.hashed_password.contains("wonderland"));
    }
}
