use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::user::models::User;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Per-request security context: the resolved user and the authority string
/// derived from its role. Absent from the request extensions when the request
/// is unauthenticated.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub authority: String,
}

/// The token after the `Bearer ` scheme prefix, if the header is well-formed.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
}

/// Request authentication gate.
///
/// Tries to resolve the bearer token into a security context and forwards the
/// request no matter what: a missing header, a malformed or expired token, an
/// unknown subject or a store failure all just leave the request
/// unauthenticated. Rejecting requests is the job of the authorization layer
/// behind it.
pub async fn authenticate<R: UserRepository>(
    State(state): State<AppState<R>>,
    mut req: Request,
    next: Next,
) -> Response {
    // An already-populated context is left untouched
    if req.extensions().get::<CurrentUser>().is_none() {
        if let Some(token) = bearer_token(req.headers()) {
            if let Some(current_user) = resolve_token(&state, token).await {
                req.extensions_mut().insert(current_user);
            }
        }
    }

    next.run(req).await
}

async fn resolve_token<R: UserRepository>(state: &AppState<R>, token: &str) -> Option<CurrentUser> {
    let subject = match state.tokens.extract_subject(token) {
        Ok(subject) => subject,
        Err(e) => {
            tracing::debug!(error = %e, "Bearer token rejected");
            return None;
        }
    };

    let user = match state.repository.find_by_username(&subject).await {
        Ok(Some(user)) if user.enabled => user,
        Ok(_) => {
            tracing::debug!(subject = %subject, "No enabled user for token subject");
            return None;
        }
        Err(e) => {
            tracing::warn!(error = %e, "User lookup failed during authentication");
            return None;
        }
    };

    if !state.tokens.is_token_valid(token, &user) {
        tracing::debug!(subject = %subject, "Token not valid for user");
        return None;
    }

    let authority = user.role.authority().to_string();
    Some(CurrentUser { user, authority })
}

/// Downstream authorization gate for protected routes.
///
/// Requests without an `Authorization: Bearer` header are denied with 403;
/// requests whose bearer token did not resolve to a user are denied with 401.
pub async fn require_authentication(req: Request, next: Next) -> Result<Response, ApiError> {
    if req.extensions().get::<CurrentUser>().is_some() {
        return Ok(next.run(req).await);
    }

    if bearer_token(req.headers()).is_none() {
        return Err(ApiError::Forbidden(
            "Authentication token is required to access this resource".to_string(),
        ));
    }

    Err(ApiError::Unauthorized("Invalid token".to_string()))
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn test_bearer_prefix_is_case_sensitive() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("bearer abc.def.ghi"),
        );
        assert_eq!(bearer_token(&headers), None);
    }
}
