use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::Json;

use super::ApiError;
use super::AuthResponseData;
use crate::domain::user::errors::AuthError;
use crate::domain::user::ports::AuthServicePort;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::middleware::bearer_token;
use crate::inbound::http::router::AppState;

/// Exchange the bearer token from the `Authorization` header for a fresh one.
pub async fn refresh<R: UserRepository>(
    State(state): State<AppState<R>>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<AuthResponseData>), ApiError> {
    let token = bearer_token(&headers).ok_or(AuthError::RefreshFailed)?;

    let session = state.auth_service.refresh_token(token).await?;

    Ok((StatusCode::OK, Json(AuthResponseData::from(&session))))
}
