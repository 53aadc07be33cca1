//! Request-time token enforcement
//!
//! The gate never touches the identity store; it trusts the subject id
//! embedded in a valid token. Optional re-fetching is layered on top by the
//! middleware when configured.

use super::error::AuthError;
use super::token::TokenService;
use axum::http::{header::AUTHORIZATION, HeaderMap, HeaderName};
use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

/// Authenticated caller, attached to the request once the gate passes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// Extracts and verifies the bearer token of an inbound request
#[derive(Clone)]
pub struct AuthGate {
    tokens: TokenService,
    header: HeaderName,
}

impl AuthGate {
    pub fn new(tokens: TokenService, header: HeaderName) -> Self {
        Self { tokens, header }
    }

    /// Token from the designated header, falling back to `Authorization: Bearer`
    pub fn extract_token<'h>(&self, headers: &'h HeaderMap) -> Option<&'h str> {
        let designated = headers
            .get(&self.header)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|token| !token.is_empty());

        designated.or_else(|| {
            headers
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.split_once(' '))
                .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
                .map(|(_, token)| token.trim())
                .filter(|token| !token.is_empty())
        })
    }

    /// Authorize a request from its headers
    ///
    /// Fails with [`AuthError::MissingToken`] when no token is present and
    /// with [`AuthError::Unauthorized`] for every verification failure.
    pub fn authorize(&self, headers: &HeaderMap) -> Result<AuthUser, AuthError> {
        let token = self.extract_token(headers).ok_or_else(|| {
            debug!("request rejected: no token");
            AuthError::MissingToken
        })?;

        let verified = self.tokens.verify(token).map_err(|reason| {
            debug!(%reason, "request rejected: token failed verification");
            AuthError::Unauthorized
        })?;

        Ok(AuthUser {
            user_id: verified.subject_id,
            expires_at: verified.expires_at,
        })
    }

    #[inline]
    pub fn header(&self) -> &HeaderName {
        &self.header
    }
}
