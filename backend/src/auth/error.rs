//! Authentication error taxonomy

use thiserror::Error;

/// Failures of the credential verifier, token service and authorization gate
///
/// Token failures (`MissingToken`, `MalformedToken`, `BadSignature`,
/// `Expired`) are distinct internally. The gate reports every one of them
/// to clients as the same 401 response.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Unknown email or wrong password; deliberately indistinguishable
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing token")]
    MissingToken,

    #[error("Malformed token")]
    MalformedToken,

    #[error("Token signature mismatch")]
    BadSignature,

    #[error("Token expired")]
    Expired,

    /// Collapsed outcome of any token rejection at the gate
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Identity store unavailable")]
    PersistenceUnavailable(#[source] anyhow::Error),

    #[error("Internal authentication error")]
    Internal(#[source] anyhow::Error),
}

impl AuthError {
    /// Whether this error is a token rejection the gate collapses to 401
    pub fn is_token_rejection(&self) -> bool {
        matches!(
            self,
            AuthError::MissingToken
                | AuthError::MalformedToken
                | AuthError::BadSignature
                | AuthError::Expired
                | AuthError::Unauthorized
        )
    }
}
