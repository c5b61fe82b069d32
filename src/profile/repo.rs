use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::theme::Theme;

/// Returns `false` when no such user exists.
pub async fn set_theme(db: &PgPool, user_id: Uuid, theme: Theme) -> anyhow::Result<bool> {
    let res = sqlx::query("UPDATE users SET theme = $2 WHERE id = $1")
        .bind(user_id)
        .bind(theme.as_str())
        .execute(db)
        .await
        .context("update theme")?;
    Ok(res.rows_affected() > 0)
}

/// Stores (or clears, with `None`) the picture object key of a user.
pub async fn set_picture_key(
    db: &PgPool,
    user_id: Uuid,
    key: Option<&str>,
) -> anyhow::Result<bool> {
    let res = sqlx::query("UPDATE users SET picture_key = $2 WHERE id = $1")
        .bind(user_id)
        .bind(key)
        .execute(db)
        .await
        .context("update picture key")?;
    Ok(res.rows_affected() > 0)
}
