use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::AuthResponseData;
use crate::domain::user::ports::AuthServicePort;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::router::AppState;

pub async fn login<R: UserRepository>(
    State(state): State<AppState<R>>,
    Json(body): Json<LoginRequest>,
) -> Result<(StatusCode, Json<AuthResponseData>), ApiError> {
    body.validate()?;

    let session = state
        .auth_service
        .login(&body.identifier, &body.password)
        .await?;

    Ok((StatusCode::OK, Json(AuthResponseData::from(&session))))
}

/// Login body; the identifier may be a username or an email.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    identifier: String,
    password: String,
}

#[derive(Debug, Clone, Error)]
enum ParseLoginRequestError {
    #[error("identifier: Username or email is required")]
    MissingIdentifier,

    #[error("identifier: Identifier must be between 3 and 50 characters")]
    IdentifierLength,

    #[error("password: Password must be at least 6 characters")]
    PasswordTooShort,
}

impl LoginRequest {
    fn validate(&self) -> Result<(), ParseLoginRequestError> {
        if self.identifier.trim().is_empty() {
            return Err(ParseLoginRequestError::MissingIdentifier);
        }
        if self.identifier.len() < 3 || self.identifier.len() > 50 {
            return Err(ParseLoginRequestError::IdentifierLength);
        }
        if self.password.len() < 6 {
            return Err(ParseLoginRequestError::PasswordTooShort);
        }
        Ok(())
    }
}

impl From<ParseLoginRequestError> for ApiError {
    fn from(err: ParseLoginRequestError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}
