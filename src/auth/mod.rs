use crate::state::AppState;
use axum::Router;

mod dto;
mod handlers;
mod repo;
pub mod repo_types;
mod services;
pub mod session_store;

pub use dto::PublicUser;
pub use repo_types::User;
pub use services::Session;
pub use session_store::{PgSessions, SessionStore};

#[cfg(test)]
pub(crate) use dto::JwtKeys;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::auth_routes())
        .merge(handlers::me_routes())
}
