use std::collections::HashMap;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claim names managed by the token service itself. Extra claims supplied by
/// callers may coexist with these but can never replace them.
pub const RESERVED_CLAIMS: [&str; 3] = ["sub", "iat", "exp"];

/// Decoded payload of a bearer token.
///
/// `sub`, `iat` and `exp` are always present on tokens issued by this crate;
/// anything else travels in the flattened `extra` map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (the principal's username)
    pub sub: String,

    /// Issued at (Unix timestamp, seconds)
    pub iat: i64,

    /// Expiration time (Unix timestamp, seconds)
    pub exp: i64,

    /// Additional custom fields (flattened into the payload)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Claims {
    /// Build claims for a subject with a validity window starting now.
    ///
    /// `exp` is exactly `iat` plus the whole-second TTL.
    pub fn for_subject(subject: &str, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
            extra: HashMap::new(),
        }
    }

    /// Merge caller-supplied claims. Reserved claim names are dropped so the
    /// subject and validity window cannot be overridden.
    pub fn with_extra_claims(mut self, extra: HashMap<String, serde_json::Value>) -> Self {
        for (key, value) in extra {
            if !RESERVED_CLAIMS.contains(&key.as_str()) {
                self.extra.insert(key, value);
            }
        }
        self
    }

    /// Get a custom claim by name.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.extra.get(key)
    }

    /// A token is expired from the instant its expiry timestamp is reached.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp <= current_timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_subject_sets_validity_window() {
        let now = Utc::now();
        let claims = Claims::for_subject("leia", now, Duration::hours(24));

        assert_eq!(claims.sub, "leia");
        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_extra_claims_cannot_override_reserved() {
        let now = Utc::now();
        let mut extra = HashMap::new();
        extra.insert("sub".to_string(), serde_json::json!("vader"));
        extra.insert("exp".to_string(), serde_json::json!(i64::MAX));
        extra.insert("rank".to_string(), serde_json::json!("general"));

        let claims = Claims::for_subject("leia", now, Duration::hours(1)).with_extra_claims(extra);

        assert_eq!(claims.sub, "leia");
        assert_eq!(claims.exp, (now + Duration::hours(1)).timestamp());
        assert_eq!(claims.get("rank"), Some(&serde_json::json!("general")));
        assert!(claims.get("sub").is_none());
    }

    #[test]
    fn test_is_expired_boundary() {
        let claims = Claims {
            sub: "leia".to_string(),
            iat: 900,
            exp: 1000,
            extra: HashMap::new(),
        };

        assert!(!claims.is_expired(999));
        assert!(claims.is_expired(1000)); // exp <= now is expired
        assert!(claims.is_expired(1001));
    }
}
