mod handlers;
mod repo;
mod services;
mod theme;

use crate::state::AppState;
use axum::Router;

pub use theme::Theme;

pub fn router() -> Router<AppState> {
    handlers::profile_routes()
}
