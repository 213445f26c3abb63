use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::user::errors::AuthError;
use crate::user::models::AuthSession;
use crate::user::models::User;

pub mod login;
pub mod refresh;
pub mod register;
pub mod validate;

/// Errors surfaced to HTTP clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    Conflict(String),
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "Validation Failed", msg),
            ApiError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "Authentication Failed", msg)
            }
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "Access Denied", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "Conflict", msg),
            ApiError::InternalServerError(msg) => {
                // The real cause is logged only; the response stays generic
                tracing::error!(error = %msg, "Unexpected error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        (status, Json(ErrorResponseBody::new(status, error, message))).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::InvalidToken | AuthError::RefreshFailed => {
                ApiError::Unauthorized(err.to_string())
            }
            AuthError::UsernameAlreadyExists(_) | AuthError::EmailAlreadyExists(_) => {
                ApiError::Conflict(err.to_string())
            }
            AuthError::Password(_) | AuthError::DatabaseError(_) | AuthError::Unknown(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponseBody {
    pub status: u16,
    pub error: String,
    pub message: String,
}

impl ErrorResponseBody {
    pub fn new(status: StatusCode, error: &str, message: String) -> Self {
        Self {
            status: status.as_u16(),
            error: error.to_string(),
            message,
        }
    }
}

/// Body of successful login/register/refresh responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthResponseData {
    pub token: String,
    #[serde(rename = "type")]
    pub token_type: String,
    pub user: UserData,
}

impl From<&AuthSession> for AuthResponseData {
    fn from(session: &AuthSession) -> Self {
        Self {
            token: session.token.clone(),
            token_type: "Bearer".to_string(),
            user: (&session.user).into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: user.role.to_string(),
            enabled: user.enabled,
            created_at: user.created_at,
        }
    }
}
