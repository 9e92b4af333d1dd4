use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo::User;

/// User view returned to clients; never carries the password hash.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

/// Request body for creating a user through the users collection.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// Request body for a user update; omitting the password keeps the old one.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub email: String,
    pub name: String,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_params_defaults() {
        let params: ListParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.skip, 0);
        assert_eq!(params.limit, 100);

        let params: ListParams = serde_json::from_str(r#"{"skip": 10, "limit": 5}"#).unwrap();
        assert_eq!(params.skip, 10);
        assert_eq!(params.limit, 5);
    }

    #[test]
    fn update_request_password_is_optional() {
        let body: UpdateUserRequest =
            serde_json::from_str(r#"{"email": "a@x.com", "name": "A"}"#).unwrap();
        assert!(body.password.is_none());
    }
}
