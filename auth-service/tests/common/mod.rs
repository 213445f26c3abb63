use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::TokenService;
use auth_service::domain::user::errors::AuthError;
use auth_service::domain::user::models::Role;
use auth_service::domain::user::models::User;
use auth_service::domain::user::models::UserId;
use auth_service::domain::user::ports::UserRepository;
use auth_service::domain::user::service::AuthService;
use auth_service::inbound::http::router::create_router;
use chrono::Duration;
use chrono::Utc;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// In-memory stand-in for the Postgres repository, with the same uniqueness
/// semantics.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user directly, bypassing registration.
    pub fn insert(&self, user: User) {
        self.users.lock().unwrap().push(user);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_enabled_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<User>, AuthError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.enabled && (u.username == identifier || u.email == identifier))
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AuthError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, AuthError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .any(|u| u.username == username))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, AuthError> {
        Ok(self.users.lock().unwrap().iter().any(|u| u.email == email))
    }

    async fn save(&self, user: User) -> Result<User, AuthError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == user.username) {
            return Err(AuthError::UsernameAlreadyExists(user.username));
        }
        if users.iter().any(|u| u.email == user.email) {
            return Err(AuthError::EmailAlreadyExists(user.email));
        }
        users.push(user.clone());
        Ok(user)
    }
}

/// Build a user record with a real Argon2 hash for direct seeding.
pub fn seeded_user(username: &str, email: &str, password: &str, enabled: bool) -> User {
    User {
        id: UserId::new(),
        username: username.to_string(),
        email: email.to_string(),
        password_hash: PasswordHasher::new().hash(password).unwrap(),
        first_name: username.to_string(),
        last_name: "Test".to_string(),
        role: Role::User,
        enabled,
        created_at: Utc::now(),
    }
}

/// Test application serving the real router on a random port.
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub repository: Arc<InMemoryUserRepository>,
    pub tokens: Arc<TokenService>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_ttl(Duration::hours(24)).await
    }

    /// Spawn with an explicit token TTL; `Duration::zero()` yields tokens
    /// that are already expired when issued.
    pub async fn spawn_with_ttl(ttl: Duration) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryUserRepository::new());
        let tokens = Arc::new(TokenService::new(TEST_SECRET, ttl));
        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&repository),
            Arc::clone(&tokens),
        ));

        let router = create_router(auth_service, Arc::clone(&repository), Arc::clone(&tokens));
        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Server task failed");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            repository,
            tokens,
        }
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }
}
