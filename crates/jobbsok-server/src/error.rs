use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use jobbsok_core::AppError;

use crate::dto::{ApiEnvelope, ResponseError};

/// API error type that maps to HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// One message per invalid field in the payload.
    #[error("Validation failed")]
    Validation(Vec<String>),

    #[error("Access denied")]
    Unauthorized,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn messages(&self) -> Vec<String> {
        match self {
            ApiError::Validation(messages) => messages.clone(),
            other => vec![other.to_string()],
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let errors = self
            .messages()
            .into_iter()
            .map(|message| ResponseError::new(message, status.as_u16()))
            .collect();

        let body = Json(ApiEnvelope::<()>::failed(errors));
        (status, body).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        match &err {
            AppError::JobPostNotFound(id) => ApiError::NotFound(format!("Job post not found: {}", id)),
            AppError::BadSecretKey => ApiError::Unauthorized,
            // A data gap in the geography table is a server fault, not
            // a client error.
            AppError::UnknownMunicipality(token) => {
                ApiError::Internal(format!("Unknown municipality: {}", token))
            }
            AppError::Database(_) => ApiError::Internal("Database error".to_string()),
        }
    }
}
