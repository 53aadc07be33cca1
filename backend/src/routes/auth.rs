//! Authentication routes
//!
//! `POST /api/auth` exchanges credentials for a token; `GET /api/auth/me`
//! returns the caller behind a valid token.

use super::extract::ValidatedJson;
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use devconnector_shared::{DataResponse, LoginRequest, TokenResponse, User};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(login))
        .route("/me", get(me))
}

/// POST /api/auth
///
/// Unknown email and wrong password produce the same 401.
async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let token = UserService::login(state.db(), state.tokens(), &req).await?;
    Ok(Json(TokenResponse::new(token)))
}

/// GET /api/auth/me
async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<DataResponse<User>>> {
    let user = UserService::me(state.db(), auth.user_id).await?;
    Ok(Json(DataResponse::new(user)))
}
