mod dto;
mod handlers;
mod repo;
pub mod repo_types;
mod validate;

use crate::state::AppState;
use axum::Router;

pub use repo_types::{ExerciseDefinition, WorkoutEntry};

pub fn router() -> Router<AppState> {
    handlers::workout_routes()
}
