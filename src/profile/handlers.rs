use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use super::{
    repo,
    services::{is_supported_image, presign_picture, upload_picture, UploadItem},
    theme::{Palette, Theme},
};
use crate::{
    auth::{PublicUser, Session, User},
    error::{AppError, AppResult},
    inflight::Form,
    state::AppState,
};

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile))
        .route("/profile/theme", put(set_theme))
        .route("/profile/palette", get(get_palette))
        .route(
            "/profile/picture",
            put(upload_profile_picture).delete(delete_profile_picture),
        )
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024)) // 10MB
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: PublicUser,
    pub picture_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ThemeRequest {
    pub theme: Theme,
}

#[derive(Debug, Serialize)]
pub struct PictureResponse {
    pub picture_url: String,
}

async fn load_user(state: &AppState, session: &Session) -> AppResult<User> {
    User::find_by_id(&state.db, session.user_id)
        .await?
        .ok_or_else(|| {
            warn!(user_id = %session.user_id, "user not found");
            AppError::NotFound("User not found".into())
        })
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<ProfileResponse>> {
    let user = load_user(&state, &session).await?;
    let picture_url = match user.picture_key.as_deref() {
        Some(key) => Some(presign_picture(&state, key).await.map_err(|e| {
            error!(error = %e, user_id = %user.id, "presign picture failed");
            AppError::Upstream(e)
        })?),
        None => None,
    };
    Ok(Json(ProfileResponse {
        user: user.into(),
        picture_url,
    }))
}

#[instrument(skip(state))]
pub async fn set_theme(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<ThemeRequest>,
) -> AppResult<Json<Palette>> {
    if !repo::set_theme(&state.db, session.user_id, body.theme).await? {
        return Err(AppError::NotFound("User not found".into()));
    }
    info!(user_id = %session.user_id, theme = body.theme.as_str(), "theme updated");
    Ok(Json(Palette::for_theme(body.theme)))
}

#[instrument(skip(state))]
pub async fn get_palette(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<Palette>> {
    let user = load_user(&state, &session).await?;
    Ok(Json(Palette::for_theme(user.theme())))
}

/// PUT /profile/picture (multipart, field `picture`)
#[instrument(skip(state, mp))]
pub async fn upload_profile_picture(
    State(state): State<AppState>,
    session: Session,
    mut mp: Multipart,
) -> AppResult<Json<PictureResponse>> {
    let _guard = state.inflight.begin(session.user_id, Form::ProfilePicture)?;

    let mut picture = None;
    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some("picture") {
            continue;
        }
        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".into());
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::validation(format!("invalid picture: {e}")))?;
        picture = Some((content_type, data));
    }

    let (content_type, body) =
        picture.ok_or_else(|| AppError::validation("Please select or take a photo."))?;
    if !is_supported_image(&content_type) {
        warn!(%content_type, "unsupported picture type");
        return Err(AppError::validation("Unsupported image type"));
    }
    if body.is_empty() {
        return Err(AppError::validation("Picture is empty"));
    }

    let item = UploadItem {
        body,
        content_type: &content_type,
    };
    let key = upload_picture(&state, session.user_id, item)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %session.user_id, "picture upload failed");
            AppError::Upstream(e)
        })?;

    if !repo::set_picture_key(&state.db, session.user_id, Some(&key)).await? {
        return Err(AppError::NotFound("User not found".into()));
    }

    let picture_url = presign_picture(&state, &key)
        .await
        .map_err(AppError::Upstream)?;
    info!(user_id = %session.user_id, "profile picture uploaded");
    Ok(Json(PictureResponse { picture_url }))
}

#[instrument(skip(state))]
pub async fn delete_profile_picture(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<StatusCode> {
    let user = load_user(&state, &session).await?;
    let Some(key) = user.picture_key else {
        return Ok(StatusCode::NO_CONTENT);
    };

    state.pictures.remove(&key).await.map_err(|e| {
        error!(error = %e, user_id = %user.id, "picture delete failed");
        AppError::Upstream(e)
    })?;
    repo::set_picture_key(&state.db, user.id, None).await?;
    info!(user_id = %user.id, "profile picture removed");
    Ok(StatusCode::NO_CONTENT)
}
