use crate::auth::repo_types::{NewUser, SessionRow, User};
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

const USER_COLUMNS: &str =
    "id, first_name, last_name, username, email, password_hash, theme, picture_key, created_at";

impl User {
    /// Find a user by username.
    pub async fn find_by_username(db: &PgPool, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Whether the username or email is already registered.
    pub async fn exists(db: &PgPool, username: &str, email: &str) -> anyhow::Result<bool> {
        let found: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM users WHERE username = $1 OR email = $2 LIMIT 1")
                .bind(username)
                .bind(email)
                .fetch_optional(db)
                .await?;
        Ok(found.is_some())
    }

    /// Create a new user with hashed password.
    pub async fn create(db: &PgPool, new: &NewUser<'_>) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (first_name, last_name, username, email, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(new.first_name)
        .bind(new.last_name)
        .bind(new.username)
        .bind(new.email)
        .bind(new.password_hash)
        .fetch_one(db)
        .await?;
        Ok(user)
    }
}

impl SessionRow {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        expires_at: OffsetDateTime,
    ) -> anyhow::Result<SessionRow> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            INSERT INTO sessions (user_id, expires_at)
            VALUES ($1, $2)
            RETURNING id, user_id, expires_at
            "#,
        )
        .bind(user_id)
        .bind(expires_at)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    /// Live session of `user_id` with the given id, if it has not expired.
    pub async fn find_active(
        db: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> anyhow::Result<Option<SessionRow>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, user_id, expires_at
              FROM sessions
             WHERE id = $1 AND user_id = $2 AND expires_at > now()
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn extend(db: &PgPool, id: Uuid, expires_at: OffsetDateTime) -> anyhow::Result<()> {
        sqlx::query("UPDATE sessions SET expires_at = $2 WHERE id = $1")
            .bind(id)
            .bind(expires_at)
            .execute(db)
            .await?;
        Ok(())
    }

    pub async fn delete(db: &PgPool, id: Uuid, user_id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM sessions WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
