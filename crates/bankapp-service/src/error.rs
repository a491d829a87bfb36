//! Error types for bankapp-service

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bankapp_core::{AccountError, RepositoryError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Startup errors.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

/// Request-level errors rendered as `{"message": ...}` bodies.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Http { status: StatusCode, message: String },
    #[error(transparent)]
    Account(#[from] AccountError),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Http {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Http { status, .. } => *status,
            ApiError::Account(err) => match err {
                AccountError::AccountNotFound(_) => StatusCode::NOT_FOUND,
                AccountError::InvalidAmount(_) => StatusCode::BAD_REQUEST,
                AccountError::InsufficientFunds { .. } => StatusCode::BAD_REQUEST,
                AccountError::UnauthorizedOperation(_) => StatusCode::FORBIDDEN,
                AccountError::Repository(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
                AccountError::Repository(RepositoryError::NotFound(_)) => StatusCode::NOT_FOUND,
                AccountError::Repository(RepositoryError::Backend(_)) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Http {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Http {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            format!("Unexpected error: {}", self)
        } else {
            self.to_string()
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;
