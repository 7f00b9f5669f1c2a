use crate::{
    auth::AuthError, books::BookError, database::DatabaseError, storage::StorageError,
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use tracing::error;

#[derive(Debug)]
pub enum AppError {
    Config(config::ConfigError),
    Auth(AuthError),
    Book(BookError),
    Database(DatabaseError),
    Storage(StorageError),
    BadRequest(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "Configuration error: {}", err),
            AppError::Auth(err) => write!(f, "{}", err),
            AppError::Book(err) => write!(f, "{}", err),
            AppError::Database(err) => write!(f, "Database error: {}", err),
            AppError::Storage(err) => write!(f, "Storage error: {}", err),
            AppError::BadRequest(msg) => write!(f, "{}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Auth(err)
    }
}

impl From<BookError> for AppError {
    fn from(err: BookError) -> Self {
        AppError::Book(err)
    }
}

impl From<DatabaseError> for AppError {
    fn from(err: DatabaseError) -> Self {
        AppError::Database(err)
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err)
    }
}

impl AppError {
    /// HTTP status and short error category for the response body
    pub fn status_and_category(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Configuration error"),
            AppError::Auth(err) => match err {
                AuthError::MissingCredentials
                | AuthError::MalformedHeader
                | AuthError::InvalidToken(_) => {
                    (StatusCode::UNAUTHORIZED, "Authentication failed")
                }
                AuthError::TokenRevoked => (StatusCode::UNAUTHORIZED, "Token revoked"),
                AuthError::LoginInitiation { .. } => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "OAuth login failed")
                }
                AuthError::InvalidState { .. } => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "OAuth state validation failed",
                ),
                AuthError::TokenExchange { .. } => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "OAuth token exchange failed")
                }
                AuthError::UserInfo { .. } => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "OAuth user info failed")
                }
                AuthError::TokenIssue(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "Session token error")
                }
                AuthError::BlacklistCheck(_) | AuthError::Logout(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
                }
            },
            AppError::Book(err) => match err {
                BookError::NotFound(_) => (StatusCode::NOT_FOUND, "Not found"),
                BookError::InvalidId(_)
                | BookError::InvalidRating(_)
                | BookError::MissingField(_) => (StatusCode::BAD_REQUEST, "Bad request"),
                BookError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Database Error"),
            },
            AppError::Database(_) | AppError::Storage(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Database Error")
            }
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "Bad request"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, category) = self.status_and_category();

        // Storage and internal details stay in the logs
        let message = match &self {
            AppError::Database(_) | AppError::Storage(_) | AppError::Internal(_) => {
                category.to_string()
            }
            AppError::Book(BookError::Storage(_)) => category.to_string(),
            other => other.to_string(),
        };

        if status.is_server_error() {
            error!(error = ?self, status = %status.as_u16(), "Request failed");
        }

        let body = Json(json!({
            "error": category,
            "message": message,
        }));

        (status, body).into_response()
    }
}
