use std::sync::Arc;
use std::time::Duration;

use auth::TokenService;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware::from_fn;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::login::login;
use super::handlers::refresh::refresh;
use super::handlers::register::register;
use super::handlers::validate::validate;
use super::middleware::authenticate;
use super::middleware::require_authentication;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::service::AuthService;

pub struct AppState<R: UserRepository> {
    pub auth_service: Arc<AuthService<R>>,
    pub repository: Arc<R>,
    pub tokens: Arc<TokenService>,
}

impl<R: UserRepository> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            auth_service: Arc::clone(&self.auth_service),
            repository: Arc::clone(&self.repository),
            tokens: Arc::clone(&self.tokens),
        }
    }
}

pub fn create_router<R: UserRepository>(
    auth_service: Arc<AuthService<R>>,
    repository: Arc<R>,
    tokens: Arc<TokenService>,
) -> Router {
    let state = AppState {
        auth_service,
        repository,
        tokens,
    };

    let public_routes = Router::new()
        .route("/api/auth/login", post(login::<R>))
        .route("/api/auth/register", post(register::<R>))
        .route("/api/auth/refresh", post(refresh::<R>));

    let protected_routes = Router::new()
        .route("/api/auth/validate", get(validate::<R>))
        .route_layer(from_fn(require_authentication));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        // The authentication gate wraps every route; the guard above only
        // applies to protected ones
        .layer(from_fn_with_state(state.clone(), authenticate::<R>))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
