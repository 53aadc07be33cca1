//! User registration and listing
//!
//! Password hashing runs on the blocking thread pool.

use super::extract::ValidatedJson;
use crate::error::ApiResult;
use crate::services::UserService;
use crate::state::AppState;
use axum::{extract::State, routing::post, Json, Router};
use devconnector_shared::{DataResponse, RegisterRequest, TokenResponse, User};

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/", post(register).get(list_users))
}

/// POST /api/users
async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let token = UserService::register(state.db(), state.passwords(), state.tokens(), &req).await?;
    Ok(Json(TokenResponse::new(token)))
}

/// GET /api/users
async fn list_users(State(state): State<AppState>) -> ApiResult<Json<DataResponse<Vec<User>>>> {
    let users = UserService::list(state.db()).await?;
    Ok(Json(DataResponse::list(users)))
}
