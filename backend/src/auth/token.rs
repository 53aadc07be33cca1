//! Signed, time-bound bearer tokens
//!
//! Tokens are HS256 JWTs carrying `{sub, iat, exp}`. Signing keys are
//! derived once from the shared secret and shared behind `Arc`, so the
//! service is cheap to clone into every handler.
//!
//! Expiry is checked here against the injected [`Clock`] rather than by
//! `jsonwebtoken`, which always reads the system time and applies leeway.

use super::clock::{Clock, SystemClock};
use super::error::AuthError;
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// JWT claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Decoded contents of a verified token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedToken {
    pub subject_id: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Pre-computed JWT keys for efficient token operations
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    /// Create new JWT keys from secret
    /// This should be called once at startup
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }

    pub fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    pub fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

/// Token issuance and verification
///
/// Call [`TokenService::new`] once at startup and store it in `AppState`.
#[derive(Clone)]
pub struct TokenService {
    keys: JwtKeys,
    validation: Arc<Validation>,
    default_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    /// Create a token service using the system clock
    pub fn new(secret: &str, default_ttl_secs: i64) -> Self {
        Self::with_clock(secret, default_ttl_secs, Arc::new(SystemClock))
    }

    /// Create a token service reading time from `clock`
    ///
    /// A default lifetime chrono cannot represent is stored as zero, and
    /// [`TokenService::issue_default`] then refuses to sign.
    pub fn with_clock(secret: &str, default_ttl_secs: i64, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            keys: JwtKeys::new(secret),
            validation: Arc::new(validation),
            default_ttl: Duration::try_seconds(default_ttl_secs).unwrap_or_else(Duration::zero),
            clock,
        }
    }

    /// Issue a token for `subject_id` valid for `ttl` from now
    ///
    /// Fails when `ttl` is not positive or the expiry overflows.
    pub fn issue(&self, subject_id: Uuid, ttl: Duration) -> Result<String> {
        if ttl <= Duration::zero() {
            anyhow::bail!("Token lifetime must be positive, got {}s", ttl.num_seconds());
        }

        let now = self.clock.now();
        let exp = now
            .checked_add_signed(ttl)
            .ok_or_else(|| anyhow::anyhow!("Token lifetime of {}s overflows", ttl.num_seconds()))?;

        let claims = Claims {
            sub: subject_id.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, self.keys.encoding())
            .map_err(|e| anyhow::anyhow!("Failed to sign token: {}", e))
    }

    /// Issue a token with the configured default lifetime
    #[inline]
    pub fn issue_default(&self, subject_id: Uuid) -> Result<String> {
        self.issue(subject_id, self.default_ttl)
    }

    /// Verify a token's signature and expiry and decode its claims
    pub fn verify(&self, token: &str) -> Result<VerifiedToken, AuthError> {
        let claims = decode::<Claims>(token, self.keys.decoding(), &self.validation)
            .map_err(|e| {
                debug!(error = %e, "token rejected by decoder");
                match e.kind() {
                    ErrorKind::InvalidSignature => AuthError::BadSignature,
                    ErrorKind::ExpiredSignature => AuthError::Expired,
                    _ => AuthError::MalformedToken,
                }
            })?
            .claims;

        let subject_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::MalformedToken)?;
        let issued_at =
            DateTime::<Utc>::from_timestamp(claims.iat, 0).ok_or(AuthError::MalformedToken)?;
        let expires_at =
            DateTime::<Utc>::from_timestamp(claims.exp, 0).ok_or(AuthError::MalformedToken)?;

        if self.clock.now().timestamp() >= claims.exp {
            return Err(AuthError::Expired);
        }

        Ok(VerifiedToken {
            subject_id,
            issued_at,
            expires_at,
        })
    }

    /// Default token lifetime
    #[inline]
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Current time according to this service's clock
    #[inline]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}
