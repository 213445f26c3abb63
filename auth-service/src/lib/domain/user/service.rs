use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::TokenService;
use chrono::Utc;

use crate::domain::user::errors::AuthError;
use crate::domain::user::models::AuthSession;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::Role;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::AuthServicePort;
use crate::domain::user::ports::UserRepository;

/// Authentication coordinator.
///
/// The only component that composes the credential store, the password hasher
/// and the token service. Stateless apart from those collaborators, so it is
/// safe to share across request-handling tasks.
pub struct AuthService<R>
where
    R: UserRepository,
{
    repository: Arc<R>,
    password_hasher: PasswordHasher,
    tokens: Arc<TokenService>,
}

impl<R> AuthService<R>
where
    R: UserRepository,
{
    pub fn new(repository: Arc<R>, tokens: Arc<TokenService>) -> Self {
        Self {
            repository,
            password_hasher: PasswordHasher::new(),
            tokens,
        }
    }

    fn issue_session(&self, user: User) -> Result<AuthSession, AuthError> {
        let token = self
            .tokens
            .issue(&user)
            .map_err(|e| AuthError::Unknown(format!("Token generation failed: {}", e)))?;
        Ok(AuthSession { token, user })
    }
}

#[async_trait]
impl<R> AuthServicePort for AuthService<R>
where
    R: UserRepository,
{
    async fn login(&self, identifier: &str, password: &str) -> Result<AuthSession, AuthError> {
        tracing::info!(identifier = %identifier, "Login attempt");

        let user = self
            .repository
            .find_enabled_by_identifier(identifier)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        // A hash that fails to parse is reported the same as a mismatch so
        // callers cannot tell the cases apart.
        let password_matches = self
            .password_hasher
            .verify(password, &user.password_hash)
            .unwrap_or(false);

        if !password_matches {
            tracing::info!(identifier = %identifier, "Login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!(username = %user.username, "Login successful");
        self.issue_session(user)
    }

    async fn register(&self, command: RegisterCommand) -> Result<AuthSession, AuthError> {
        tracing::info!(username = %command.username, "Registering new user");

        // Username and email uniqueness are checked independently; the
        // username check takes precedence when both collide.
        if self.repository.exists_by_username(&command.username).await? {
            return Err(AuthError::UsernameAlreadyExists(command.username));
        }

        if self.repository.exists_by_email(&command.email).await? {
            return Err(AuthError::EmailAlreadyExists(command.email));
        }

        let password_hash = self.password_hasher.hash(&command.password)?;

        let user = User {
            id: UserId::new(),
            username: command.username,
            email: command.email,
            password_hash,
            first_name: command.first_name,
            last_name: command.last_name,
            role: Role::User,
            enabled: true,
            created_at: Utc::now(),
        };

        let saved = self.repository.save(user).await?;
        tracing::info!(user_id = %saved.id, username = %saved.username, "User registered");

        self.issue_session(saved)
    }

    async fn validate_token(&self, token: &str) -> Result<User, AuthError> {
        tracing::debug!("Validating bearer token");

        let subject = self
            .tokens
            .extract_subject(token)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token rejected");
                AuthError::InvalidToken
            })?;

        let user = self
            .repository
            .find_by_username(&subject)
            .await
            .map_err(|_| AuthError::InvalidToken)?
            .filter(|user| user.enabled)
            .ok_or(AuthError::InvalidToken)?;

        if !self.tokens.is_token_valid(token, &user) {
            return Err(AuthError::InvalidToken);
        }

        Ok(user)
    }

    async fn refresh_token(&self, token: &str) -> Result<AuthSession, AuthError> {
        tracing::debug!("Refreshing bearer token");

        let subject = self
            .tokens
            .extract_subject(token)
            .map_err(|_| AuthError::RefreshFailed)?;

        let user = self
            .repository
            .find_by_username(&subject)
            .await
            .map_err(|_| AuthError::RefreshFailed)?
            .filter(|user| user.enabled)
            .ok_or(AuthError::RefreshFailed)?;

        if !self.tokens.is_token_valid(token, &user) {
            return Err(AuthError::RefreshFailed);
        }

        self.issue_session(user).map_err(|_| AuthError::RefreshFailed)
    }
}
