use anyhow::Context;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{MealRecord, NewMeal};

pub async fn insert(db: &PgPool, user_id: Uuid, meal: &NewMeal) -> anyhow::Result<MealRecord> {
    let row = sqlx::query_as::<_, MealRecord>(
        r#"
        INSERT INTO meals (user_id, meal_name, calories, carbs, fats, protein)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, user_id, meal_name, calories, carbs, fats, protein, created_at
        "#,
    )
    .bind(user_id)
    .bind(&meal.meal_name)
    .bind(meal.macros.calories)
    .bind(meal.macros.carbs)
    .bind(meal.macros.fats)
    .bind(meal.macros.protein)
    .fetch_one(db)
    .await
    .context("insert meal")?;
    Ok(row)
}

/// All meals of a user created at or after `since`, newest first.
pub async fn list_since(
    db: &PgPool,
    user_id: Uuid,
    since: OffsetDateTime,
) -> anyhow::Result<Vec<MealRecord>> {
    let rows = sqlx::query_as::<_, MealRecord>(
        r#"
        SELECT id, user_id, meal_name, calories, carbs, fats, protein, created_at
          FROM meals
         WHERE user_id = $1 AND created_at >= $2
         ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .bind(since)
    .fetch_all(db)
    .await
    .context("list meals since")?;
    Ok(rows)
}
