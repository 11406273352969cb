//! User models
//!
//! Three shapes for one user:
//! - `UserIn`: what clients send, including the plaintext password
//! - `UserInDb`: what gets "saved", with the password hashed
//! - `UserOut`: what clients get back, never carrying a password

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::services::password::hash_password;

/// Request body for creating a user
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserIn {
    #[validate(length(min = 1))]
    pub username: String,
    pub password: String,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Stored form of a user
#[derive(Debug, Clone, Serialize)]
pub struct UserInDb {
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    /// Password hash (see `services::password`)
    #[serde(skip_serializing)]
    pub hashed_password: String,
}

impl TryFrom<UserIn> for UserInDb {
    type Error = anyhow::Error;

    fn try_from(user: UserIn) -> Result<Self, Self::Error> {
        Ok(Self {
            hashed_password: hash_password(&user.password)?,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
        })
    }
}

/// Response body for a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserOut {
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
}

impl From<UserInDb> for UserOut {
    fn from(user: UserInDb) -> Self {
        Self {
            username: user.username,
            email: user.email,
            full_name: user.full_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::{
        password_hash::{PasswordHash, PasswordVerifier},
        Argon2,
    };

    fn sample_user() -> UserIn {
        UserIn {
            username: "john".to_string(),
            password: "secret".to_string(),
            email: "john@example.com".to_string(),
            full_name: Some("John Doe".to_string()),
        }
    }

    #[test]
    fn test_user_in_db_hashes_password() {
        let stored = UserInDb::try_from(sample_user()).unwrap();

        assert_ne!(stored.hashed_password, "secret");
        let parsed = PasswordHash::new(&stored.hashed_password).unwrap();
        assert!(Argon2::default()
            .verify_password(b"secret", &parsed)
            .is_ok());
    }

    #[test]
    fn test_user_in_db_never_serializes_hash() {
        let stored = UserInDb::try_from(sample_user()).unwrap();
        let value = serde_json::to_value(&stored).unwrap();

        assert!(value.get("hashed_password").is_none());
        assert_eq!(value["username"], "john");
    }

    #[test]
    fn test_user_out_has_no_password() {
        let out = UserOut::from(UserInDb::try_from(sample_user()).unwrap());
        let value = serde_json::to_value(&out).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 3);
        assert!(!object.contains_key("password"));
        assert_eq!(value["full_name"], "John Doe");
    }

    #[test]
    fn test_user_in_invalid_email() {
        let mut user = sample_user();
        user.email = "not-an-email".to_string();

        let errors = user.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }
}
