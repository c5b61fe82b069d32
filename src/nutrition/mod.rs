pub mod client;
mod handlers;
pub mod macros;
pub mod search;

use crate::state::AppState;
use axum::Router;

pub use client::{FdcClient, NutritionLookup};
pub use search::SearchSessions;

pub fn router() -> Router<AppState> {
    handlers::search_routes()
}
