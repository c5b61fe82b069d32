use anyhow::Context;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::repo_types::{ExerciseDefinition, NewWorkoutEntry, WorkoutEntry};

/// Insert the exercise name if the user does not have it yet.
/// Returns `true` when a new definition was created.
pub async fn define_exercise_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    exercise_name: &str,
) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO exercises (user_id, exercise_name)
        VALUES ($1, $2)
        ON CONFLICT (user_id, exercise_name) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(exercise_name)
    .execute(&mut **tx)
    .await
    .context("define exercise")?;
    Ok(result.rows_affected() == 1)
}

pub async fn insert_entry_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    entry: &NewWorkoutEntry,
) -> anyhow::Result<WorkoutEntry> {
    let row = sqlx::query_as::<_, WorkoutEntry>(
        r#"
        INSERT INTO workout_entries (user_id, exercise_name, sets, reps, weight)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, user_id, exercise_name, sets, reps, weight, created_at
        "#,
    )
    .bind(user_id)
    .bind(&entry.exercise_name)
    .bind(entry.sets)
    .bind(entry.reps)
    .bind(entry.weight)
    .fetch_one(&mut **tx)
    .await
    .context("insert workout entry")?;
    Ok(row)
}

// ---- Queries ----

pub async fn list_exercises(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<ExerciseDefinition>> {
    let rows = sqlx::query_as::<_, ExerciseDefinition>(
        r#"
        SELECT id, user_id, exercise_name, created_at
          FROM exercises
         WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("list exercises")?;
    Ok(rows)
}

/// Every entry of the user, newest first.
pub async fn list_entries(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<WorkoutEntry>> {
    let rows = sqlx::query_as::<_, WorkoutEntry>(
        r#"
        SELECT id, user_id, exercise_name, sets, reps, weight, created_at
          FROM workout_entries
         WHERE user_id = $1
         ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("list workout entries")?;
    Ok(rows)
}

pub async fn list_entries_for(
    db: &PgPool,
    user_id: Uuid,
    exercise_name: &str,
) -> anyhow::Result<Vec<WorkoutEntry>> {
    let rows = sqlx::query_as::<_, WorkoutEntry>(
        r#"
        SELECT id, user_id, exercise_name, sets, reps, weight, created_at
          FROM workout_entries
         WHERE user_id = $1 AND exercise_name = $2
         ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .bind(exercise_name)
    .fetch_all(db)
    .await
    .context("list workout entries for exercise")?;
    Ok(rows)
}
