use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::Json;

use super::ApiError;
use super::UserData;
use crate::domain::user::ports::AuthServicePort;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::middleware::bearer_token;
use crate::inbound::http::router::AppState;

/// Resolve the bearer token from the `Authorization` header back to its user.
///
/// The route guard has already turned a missing or malformed header into 403,
/// so the remaining failure mode is an invalid token (401).
pub async fn validate<R: UserRepository>(
    State(state): State<AppState<R>>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<ValidateResponseData>), ApiError> {
    let token = bearer_token(&headers).ok_or_else(|| {
        ApiError::Forbidden("Authentication token is required to access this resource".to_string())
    })?;

    let user = state.auth_service.validate_token(token).await?;

    Ok((
        StatusCode::OK,
        Json(ValidateResponseData {
            user: (&user).into(),
        }),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ValidateResponseData {
    pub user: UserData,
}
