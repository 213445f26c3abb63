//! Authentication primitives library
//!
//! Provides the reusable pieces of the authentication subsystem:
//! - Password hashing (Argon2id)
//! - Bearer token issuance and verification (HS256)
//!
//! The service crate defines its own principal model and storage traits and
//! adapts these implementations to them; this crate deliberately knows
//! nothing about credentials or persistence.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{TokenPrincipal, TokenService};
//! use chrono::Duration;
//!
//! struct Account(String);
//!
//! impl TokenPrincipal for Account {
//!     fn username(&self) -> &str {
//!         &self.0
//!     }
//! }
//!
//! let tokens = TokenService::new(b"secret_key_at_least_32_bytes_long!", Duration::hours(24));
//! let account = Account("leia".to_string());
//!
//! let token = tokens.issue(&account).unwrap();
//! assert_eq!(tokens.extract_subject(&token).unwrap(), "leia");
//! assert!(tokens.is_token_valid(&token, &account));
//! ```

pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use jwt::Claims;
pub use jwt::TokenError;
pub use jwt::TokenPrincipal;
pub use jwt::TokenService;
pub use password::PasswordError;
pub use password::PasswordHasher;
