use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// A named exercise owned by a user. Names are unique per user, case-sensitive.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ExerciseDefinition {
    pub id: Uuid,
    pub user_id: Uuid,
    pub exercise_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// One logged block of work, linked to its exercise by name.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct WorkoutEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub exercise_name: String,
    pub sets: i32,
    pub reps: i32,
    pub weight: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkoutEntry {
    pub exercise_name: String,
    pub sets: i32,
    pub reps: i32,
    pub weight: f64,
}
