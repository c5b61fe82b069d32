use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Per-field validation messages, keyed by request field name.
pub type FieldErrors = BTreeMap<&'static str, String>;

/// Errors surfaced to API clients.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Validation {
        message: String,
        fields: FieldErrors,
    },
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("upstream service failed")]
    Upstream(#[source] anyhow::Error),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            fields: FieldErrors::new(),
        }
    }

    pub fn fields(fields: FieldErrors) -> Self {
        Self::Validation {
            message: "Validation failed".into(),
            fields,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Internal(e.into())
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: String,
    #[serde(skip_serializing_if = "no_fields")]
    fields: &'a FieldErrors,
}

fn no_fields(fields: &&FieldErrors) -> bool {
    fields.is_empty()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let empty = FieldErrors::new();
        let fields = match &self {
            AppError::Validation { fields, .. } => fields,
            _ => &empty,
        };
        let body = ErrorBody {
            error: self.to_string(),
            fields,
        };
        (self.status(), Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
