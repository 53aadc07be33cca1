//! Authentication middleware
//!
//! Provides the Axum extractor and route-layer middleware that run the
//! [`AuthGate`](super::AuthGate) against inbound requests.
//!
//! # Performance
//!
//! Uses pre-computed JWT keys from AppState to avoid expensive
//! key derivation on every request.

use super::error::AuthError;
use super::gate::AuthUser;
use super::store::IdentityStore;
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{FromRef, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;

/// Run the gate and, when configured, confirm the identity still exists
async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<AuthUser, ApiError> {
    let user = state.gate().authorize(headers)?;

    if state.config().auth.refetch_identity {
        let exists = state
            .db()
            .identity_exists(user.user_id)
            .await
            .map_err(AuthError::PersistenceUnavailable)?;

        if !exists {
            debug!(user_id = %user.user_id, "request rejected: identity no longer exists");
            return Err(AuthError::Unauthorized.into());
        }
    }

    Ok(user)
}

/// Extracting `AuthUser` in a handler makes the route private.
///
/// If [`auth_middleware`] already ran for this request, the user it attached
/// is reused instead of verifying the token twice.
#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(*user);
        }

        let app_state = AppState::from_ref(state);
        authenticate(&app_state, &parts.headers).await
    }
}

/// Middleware function for authentication
///
/// Apply to a group of routes with `route_layer(from_fn_with_state(..))`.
/// The authenticated user is inserted into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(&state, request.headers()).await?;
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_auth_user_debug() {
        let user = AuthUser {
            user_id: Uuid::new_v4(),
            expires_at: chrono::Utc::now(),
        };
        let debug_str = format!("{:?}", user);
        assert!(debug_str.contains("AuthUser"));
    }
}
