use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

/// User record in the database. Emails are stored and compared exactly as
/// given (case-sensitive); the store enforces uniqueness.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
}

const USER_COLUMNS: &str = "id, email, name, hashed_password, is_active, created_at";

impl User {
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: i64) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn email_exists(db: &PgPool, email: &str) -> anyhow::Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(db)
                .await?;
        Ok(exists)
    }

    /// Insert a new user; the store assigns the identifier.
    pub async fn insert(
        db: &PgPool,
        email: &str,
        name: &str,
        hashed_password: &str,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, name, hashed_password) \
             VALUES ($1, $2, $3) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(email)
        .bind(name)
        .bind(hashed_password)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    pub async fn list(db: &PgPool, skip: i64, limit: i64) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(skip)
        .fetch_all(db)
        .await?;
        Ok(users)
    }

    /// Update profile fields; the password hash is only replaced when a new
    /// one is supplied.
    pub async fn update(
        db: &PgPool,
        id: i64,
        email: &str,
        name: &str,
        hashed_password: Option<&str>,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users \
             SET email = $1, name = $2, hashed_password = COALESCE($3, hashed_password) \
             WHERE id = $4 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(email)
        .bind(name)
        .bind(hashed_password)
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn delete(db: &PgPool, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn sample_user() -> User {
        User {
            id: 7,
            email: "a@x.com".into(),
            name: "A".into(),
            hashed_password: "$argon2id$v=19$secret".into(),
            is_active: true,
            created_at: datetime!(2024-01-01 00:00:00 UTC),
        }
    }

    #[test]
    fn hashed_password_never_serialized() {
        let json = serde_json::to_value(sample_user()).unwrap();
        assert!(json.get("hashed_password").is_none());
        assert_eq!(json["email"], "a@x.com");
        assert_eq!(json["is_active"], true);
    }
}
