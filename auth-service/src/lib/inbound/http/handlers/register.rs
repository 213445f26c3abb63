use std::str::FromStr;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::AuthResponseData;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::ports::AuthServicePort;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::router::AppState;

pub async fn register<R: UserRepository>(
    State(state): State<AppState<R>>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponseData>), ApiError> {
    let session = state
        .auth_service
        .register(body.try_into_command()?)
        .await?;

    Ok((StatusCode::CREATED, Json(AuthResponseData::from(&session))))
}

/// HTTP request body for registration (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    username: String,
    email: String,
    password: String,
    first_name: String,
    last_name: String,
}

#[derive(Debug, Clone, Error)]
enum ParseRegisterRequestError {
    #[error("username: Username must be between 3 and 50 characters")]
    UsernameLength,

    #[error("email: Invalid email format")]
    InvalidEmail,

    #[error("password: Password must be at least 6 characters")]
    PasswordTooShort,

    #[error("{0}: Name is required")]
    BlankName(&'static str),
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterCommand, ParseRegisterRequestError> {
        if self.username.len() < 3 || self.username.len() > 50 {
            return Err(ParseRegisterRequestError::UsernameLength);
        }
        if email_address::EmailAddress::from_str(&self.email).is_err() {
            return Err(ParseRegisterRequestError::InvalidEmail);
        }
        if self.password.len() < 6 {
            return Err(ParseRegisterRequestError::PasswordTooShort);
        }
        if self.first_name.trim().is_empty() {
            return Err(ParseRegisterRequestError::BlankName("first_name"));
        }
        if self.last_name.trim().is_empty() {
            return Err(ParseRegisterRequestError::BlankName("last_name"));
        }

        Ok(RegisterCommand {
            username: self.username,
            email: self.email,
            password: self.password,
            first_name: self.first_name,
            last_name: self.last_name,
        })
    }
}

impl From<ParseRegisterRequestError> for ApiError {
    fn from(err: ParseRegisterRequestError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}
