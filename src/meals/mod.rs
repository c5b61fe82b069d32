mod dto;
mod handlers;
mod repo;
pub mod repo_types;
mod validate;

use crate::state::AppState;
use axum::Router;

pub use repo_types::{Macros, MealRecord};

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::read_routes())
        .merge(handlers::write_routes())
}
