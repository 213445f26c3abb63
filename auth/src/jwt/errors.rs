use thiserror::Error;

/// Error type for token operations.
///
/// The parse-side variants stay internal to the authentication subsystem;
/// callers collapse them into a single opaque rejection before anything
/// reaches a client.
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token signature is invalid")]
    SignatureInvalid,

    #[error("Token is expired")]
    Expired,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            // A token declaring an unexpected algorithm is treated the same
            // as a bad signature.
            ErrorKind::InvalidSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::ImmatureSignature => TokenError::SignatureInvalid,
            _ => TokenError::Malformed(err.to_string()),
        }
    }
}
