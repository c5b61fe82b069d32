use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{debug, error, info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicUser, RefreshRequest, RegisterRequest},
        repo_types::{NewUser, SessionRow, User},
        services::{hash_password, validate_registration, verify_password, JwtKeys, Session},
    },
    error::{AppError, AppResult},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

fn is_unique_violation(e: &anyhow::Error) -> bool {
    matches!(
        e.downcast_ref::<sqlx::Error>(),
        Some(sqlx::Error::Database(db)) if db.is_unique_violation()
    )
}

/// Opens a session for `user` and issues its token pair.
async fn start_session(state: &AppState, user: User) -> AppResult<AuthResponse> {
    let keys = JwtKeys::from_ref(state);
    let session = SessionRow::create(&state.db, user.id, keys.session_expiry())
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %user.id, "create session failed");
            AppError::Internal(e)
        })?;
    let pair = keys.sign_pair(user.id, session.id).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        AppError::Internal(e)
    })?;
    debug!(session_id = %session.id, expires_at = %session.expires_at, "session opened");

    Ok(AuthResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        user: user.into(),
    })
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    payload.email = payload.email.trim().to_lowercase();
    payload.username = payload.username.trim().to_string();
    payload.first_name = payload.first_name.trim().to_string();
    payload.last_name = payload.last_name.trim().to_string();

    let errors = validate_registration(&payload);
    if !errors.is_empty() {
        warn!(fields = ?errors.keys().collect::<Vec<_>>(), "registration rejected");
        return Err(AppError::fields(errors));
    }

    match User::exists(&state.db, &payload.username, &payload.email).await {
        Ok(true) => {
            warn!(username = %payload.username, "username or email already registered");
            return Err(AppError::Conflict("Username or email already registered".into()));
        }
        Ok(false) => {}
        Err(e) => {
            error!(error = %e, "user lookup failed");
            return Err(AppError::Internal(e));
        }
    }

    let hash = hash_password(&payload.password).map_err(|e| {
        error!(error = %e, "hash_password failed");
        AppError::Internal(e)
    })?;

    let new_user = NewUser {
        first_name: &payload.first_name,
        last_name: &payload.last_name,
        username: &payload.username,
        email: &payload.email,
        password_hash: &hash,
    };
    let user = match User::create(&state.db, &new_user).await {
        Ok(u) => u,
        Err(e) if is_unique_violation(&e) => {
            warn!(username = %payload.username, "registration lost a uniqueness race");
            return Err(AppError::Conflict("Username or email already registered".into()));
        }
        Err(e) => {
            error!(error = %e, "create user failed");
            return Err(AppError::Internal(e));
        }
    };

    info!(user_id = %user.id, username = %user.username, "user registered");
    let response = start_session(&state, user).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let username = payload.username.trim();
    if username.is_empty() || payload.password.trim().is_empty() {
        return Err(AppError::validation("Username and password cannot be empty!"));
    }

    let user = match User::find_by_username(&state.db, username).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(%username, "login unknown username");
            return Err(AppError::Unauthorized("Invalid credentials".into()));
        }
        Err(e) => {
            error!(error = %e, "find_by_username failed");
            return Err(AppError::Internal(e));
        }
    };

    let ok = verify_password(&payload.password, &user.password_hash).map_err(|e| {
        error!(error = %e, "verify_password failed");
        AppError::Internal(e)
    })?;
    if !ok {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }

    info!(user_id = %user.id, "user logged in");
    Ok(Json(start_session(&state, user).await?))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|e| AppError::Unauthorized(e.to_string()))?;

    let session = SessionRow::find_active(&state.db, claims.sid, claims.sub)
        .await?
        .ok_or_else(|| {
            warn!(session_id = %claims.sid, "refresh for ended session");
            AppError::Unauthorized("Session has ended".into())
        })?;

    let user = User::find_by_id(&state.db, session.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;

    SessionRow::extend(&state.db, session.id, keys.session_expiry()).await?;
    let pair = keys.sign_pair(user.id, session.id)?;
    Ok(Json(AuthResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        user: user.into(),
    }))
}

#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>, session: Session) -> AppResult<StatusCode> {
    let ended = SessionRow::delete(&state.db, session.session_id, session.user_id).await?;
    state.searches.remove(session.session_id);
    info!(
        user_id = %session.user_id,
        session_id = %session.session_id,
        ended,
        "user logged out"
    );
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<PublicUser>> {
    match User::find_by_id(&state.db, session.user_id).await? {
        Some(user) => Ok(Json(user.into())),
        None => {
            warn!(user_id = %session.user_id, "user not found");
            Err(AppError::NotFound("User not found".into()))
        }
    }
}
