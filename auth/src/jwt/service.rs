use std::collections::HashMap;
use std::str::FromStr;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::TokenError;

/// Capability a principal must expose to the token layer.
///
/// The token service knows nothing else about principals, credentials or
/// storage.
pub trait TokenPrincipal {
    /// Stable unique name used as the token subject.
    fn username(&self) -> &str;
}

/// Stateless signer and verifier of bearer tokens.
///
/// Uses HS256 (HMAC with SHA-256) with a process-wide secret key and a fixed
/// time-to-live, both set once at construction. Safe to share across
/// request-handling tasks; every operation is a pure function of the token,
/// the key and the clock.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
}

impl TokenService {
    /// Create a token service over a shared secret and token lifetime.
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            ttl,
        }
    }

    /// The configured time-to-live.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a signed token for a principal.
    ///
    /// `sub` is the principal's username, `iat` is now and `exp` is now plus
    /// the configured TTL.
    pub fn issue<P: TokenPrincipal + ?Sized>(&self, principal: &P) -> Result<String, TokenError> {
        self.issue_with_claims(principal, HashMap::new())
    }

    /// Issue a signed token carrying additional claims.
    ///
    /// Extra claims may coexist with the reserved ones but can never override
    /// `sub`, `iat` or `exp`.
    pub fn issue_with_claims<P: TokenPrincipal + ?Sized>(
        &self,
        principal: &P,
        extra: HashMap<String, serde_json::Value>,
    ) -> Result<String, TokenError> {
        let claims =
            Claims::for_subject(principal.username(), Utc::now(), self.ttl).with_extra_claims(extra);
        let header = Header::new(self.algorithm);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Verify a token's structure and signature and return its claims.
    ///
    /// # Errors
    /// * `Malformed` - not a structurally valid token
    /// * `SignatureInvalid` - signature does not verify under the current key,
    ///   or the header declares a missing, `none` or otherwise different
    ///   algorithm
    /// * `Expired` - the expiry timestamp has been reached
    pub fn parse(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        // Expiry is checked below with strict `exp <= now` semantics instead
        // of the library's leeway-based check.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| classify_decode_error(token, e))?;
        let claims = token_data.claims;

        if claims.is_expired(Utc::now().timestamp()) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    /// Whether a token is a currently valid credential for the given
    /// principal: it parses, it is not expired, and its subject matches the
    /// principal's username.
    pub fn is_token_valid<P: TokenPrincipal + ?Sized>(&self, token: &str, principal: &P) -> bool {
        match self.parse(token) {
            Ok(claims) => claims.sub == principal.username(),
            Err(_) => false,
        }
    }

    /// Extract the subject from a token, failing the same way `parse` does.
    pub fn extract_subject(&self, token: &str) -> Result<String, TokenError> {
        self.extract_claim(token, |claims| claims.sub.clone())
    }

    /// Extract an arbitrary value from a token's claims.
    pub fn extract_claim<T>(
        &self,
        token: &str,
        select: impl FnOnce(&Claims) -> T,
    ) -> Result<T, TokenError> {
        let claims = self.parse(token)?;
        Ok(select(&claims))
    }
}

/// jsonwebtoken reports a header whose `alg` value it does not recognize
/// (such as `none`) as a JSON deserialization failure. Read the header
/// ourselves in that case so those tokens fail as a signature problem rather
/// than as malformed input.
fn classify_decode_error(token: &str, err: jsonwebtoken::errors::Error) -> TokenError {
    if matches!(err.kind(), jsonwebtoken::errors::ErrorKind::Json(_))
        && header_declares_unknown_algorithm(token)
    {
        return TokenError::SignatureInvalid;
    }
    TokenError::from(err)
}

/// Whether the token's header segment decodes to JSON whose `alg` field is
/// absent or names no algorithm jsonwebtoken supports.
fn header_declares_unknown_algorithm(token: &str) -> bool {
    let Some(segment) = token.split('.').next() else {
        return false;
    };
    let Ok(bytes) = URL_SAFE_NO_PAD.decode(segment) else {
        return false;
    };
    let Ok(header) = serde_json::from_slice::<serde_json::Value>(&bytes) else {
        return false;
    };

    match header.get("alg").and_then(|alg| alg.as_str()) {
        Some(alg) => Algorithm::from_str(alg).is_err(),
        None => true,
    }
}
