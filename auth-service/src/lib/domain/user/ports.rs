use async_trait::async_trait;

use crate::domain::user::errors::AuthError;
use crate::domain::user::models::AuthSession;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::User;

/// Port for the authentication coordinator.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Authenticate by username or email plus password and issue a token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - no enabled user matches the identifier, or the
    ///   password does not verify; the two cases are indistinguishable
    /// * `DatabaseError` - lookup failed
    async fn login(&self, identifier: &str, password: &str) -> Result<AuthSession, AuthError>;

    /// Register a new enabled user with the default role and issue a token.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - username is taken (checked before email)
    /// * `EmailAlreadyExists` - email is taken
    /// * `DatabaseError` - persistence failed
    async fn register(&self, command: RegisterCommand) -> Result<AuthSession, AuthError>;

    /// Resolve a bearer token to its enabled user.
    ///
    /// # Errors
    /// * `InvalidToken` - the token does not parse, is expired, its signature
    ///   does not verify, or its subject is not an enabled user
    async fn validate_token(&self, token: &str) -> Result<User, AuthError>;

    /// Exchange a still-valid token for a fresh one with the same subject.
    ///
    /// # Errors
    /// * `RefreshFailed` - any failure along the way
    async fn refresh_token(&self, token: &str) -> Result<AuthSession, AuthError>;
}

/// Persistence operations over registered users.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Find an enabled user whose username or email equals the identifier
    /// (exact, case-sensitive match on either field).
    async fn find_enabled_by_identifier(&self, identifier: &str)
        -> Result<Option<User>, AuthError>;

    /// Find a user by exact username, enabled or not.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AuthError>;

    /// Whether any user already holds this username.
    async fn exists_by_username(&self, username: &str) -> Result<bool, AuthError>;

    /// Whether any user already holds this email.
    async fn exists_by_email(&self, email: &str) -> Result<bool, AuthError>;

    /// Persist a new user.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` / `EmailAlreadyExists` - unique constraint hit
    /// * `DatabaseError` - operation failed
    async fn save(&self, user: User) -> Result<User, AuthError>;
}
