mod aggregation;
mod app;
mod auth;
mod config;
mod error;
mod form;
mod inflight;
mod meals;
mod nutrition;
mod profile;
mod state;
mod storage;
mod workouts;

use std::time::Duration;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "gymify=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let app_state = AppState::init().await?;

    // search state lives no longer than the session that owns it
    let session_ttl = Duration::from_secs(app_state.config.jwt.refresh_ttl_minutes as u64 * 60);
    app_state
        .searches
        .spawn_idle_sweep(session_ttl, Duration::from_secs(10 * 60));

    if let Err(e) = sqlx::migrate!("./migrations").run(&app_state.db).await {
        tracing::warn!(error = %e, "migration failed; continuing");
    }

    app::serve(app::build_app(app_state)).await
}
