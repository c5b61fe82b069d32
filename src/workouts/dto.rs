use serde::Serialize;

use super::repo_types::WorkoutEntry;
use crate::aggregation::ExerciseHistoryGroup;

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub exercises: Vec<String>,
    pub groups: Vec<ExerciseHistoryGroup>,
}

#[derive(Debug, Serialize)]
pub struct ExerciseCreatedResponse {
    pub exercise_name: String,
    pub created: bool,
}

/// A logged entry with its exercise's history recomputed after the write.
/// `history` is null when the re-read failed; the entry is stored either way.
#[derive(Debug, Serialize)]
pub struct WorkoutLoggedResponse {
    pub entry: WorkoutEntry,
    pub history: Option<ExerciseHistoryGroup>,
}
