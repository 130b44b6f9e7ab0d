use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::{
    repositories::SourceError,
    services::{DateRangeError, EntryError, SessionError},
    types::IdError,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Unauthorized(String),
    Forbidden(String),
    Conflict(String),
    BadRequest(String),
    Upstream(String),
    InternalServerError(anyhow::Error),
    Validation(Vec<String>),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, code, details) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, "NOT_FOUND".to_string(), None),
            AppError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                msg,
                "UNAUTHORIZED".to_string(),
                None,
            ),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, "FORBIDDEN".to_string(), None),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg, "CONFLICT".to_string(), None),
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                msg,
                "BAD_REQUEST".to_string(),
                None,
            ),
            AppError::Upstream(msg) => (
                StatusCode::BAD_GATEWAY,
                msg,
                "UPSTREAM_ERROR".to_string(),
                None,
            ),
            AppError::InternalServerError(err) => {
                tracing::error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    "INTERNAL_SERVER_ERROR".to_string(),
                    None,
                )
            }
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                "VALIDATION_ERROR".to_string(),
                Some(serde_json::json!({ "errors": errors })),
            ),
        };

        let body = Json(ErrorResponse {
            error: error_message,
            code,
            details,
        });

        (status, body).into_response()
    }
}

impl AppError {
    /// Maps a record-source failure, keeping the upstream auth verdict.
    /// `message` is what the caller sees.
    fn from_source(err: &SourceError, message: String) -> Self {
        match err {
            SourceError::Status { status: 401, .. } => AppError::Unauthorized(message),
            SourceError::Status { status: 403, .. } => AppError::Forbidden(message),
            SourceError::Status { status: 404, .. } => AppError::NotFound(message),
            SourceError::Config(_) => AppError::InternalServerError(anyhow::anyhow!(message)),
            _ => AppError::Upstream(message),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalServerError(err)
    }
}

impl From<SourceError> for AppError {
    fn from(err: SourceError) -> Self {
        let message = err.to_string();
        AppError::from_source(&err, message)
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match &err {
            SessionError::Fetch(source) => AppError::from_source(source, err.to_string()),
            SessionError::Superseded => AppError::Conflict(err.to_string()),
        }
    }
}

impl From<EntryError> for AppError {
    fn from(err: EntryError) -> Self {
        match err {
            EntryError::InvalidTime(_) => {
                AppError::Validation(vec!["time: time_format_invalid".to_string()])
            }
            EntryError::OutsideEditWindow(_) => AppError::BadRequest(err.to_string()),
            EntryError::AlreadyComplete(_) | EntryError::DirectionMismatch { .. } => {
                AppError::Conflict(err.to_string())
            }
            EntryError::Load(inner) => inner.into(),
            EntryError::Submit(ref source) => AppError::from_source(source, err.to_string()),
        }
    }
}

impl From<DateRangeError> for AppError {
    fn from(err: DateRangeError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<IdError> for AppError {
    fn from(err: IdError) -> Self {
        AppError::BadRequest(format!("Invalid employee id: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let code = e.code.as_ref();
                    format!("{}: {}", field, code)
                })
            })
            .collect();
        AppError::Validation(messages)
    }
}
