//! Post feed routes
//!
//! Every route here is private; the router applies [`auth_middleware`]
//! as a route layer, so handlers read the caller from the extensions.
//!
//! [`auth_middleware`]: crate::auth::auth_middleware

use super::extract::ValidatedJson;
use crate::auth::{auth_middleware, AuthUser};
use crate::error::ApiResult;
use crate::services::PostService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    middleware,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use devconnector_shared::{DataResponse, MessageResponse, Post, TextRequest};

pub fn post_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_post).get(list_posts))
        .route("/:post_id", get(get_post).delete(delete_post))
        .route("/like/:post_id", put(like_post))
        .route("/unlike/:post_id", put(unlike_post))
        .route("/comment/:post_id", post(add_comment))
        .route("/comment/:post_id/:comment_id", delete(delete_comment))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// POST /api/posts
async fn create_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ValidatedJson(req): ValidatedJson<TextRequest>,
) -> ApiResult<Json<DataResponse<Post>>> {
    let post = PostService::create(state.db(), auth.user_id, &req.text).await?;
    Ok(Json(DataResponse::new(post)))
}

/// GET /api/posts
async fn list_posts(State(state): State<AppState>) -> ApiResult<Json<DataResponse<Vec<Post>>>> {
    let posts = PostService::list(state.db()).await?;
    Ok(Json(DataResponse::list(posts)))
}

/// GET /api/posts/:post_id
async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> ApiResult<Json<DataResponse<Post>>> {
    let post = PostService::get(state.db(), &post_id).await?;
    Ok(Json(DataResponse::new(post)))
}

/// DELETE /api/posts/:post_id
async fn delete_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(post_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    PostService::delete(state.db(), auth.user_id, &post_id).await?;
    Ok(Json(MessageResponse::new("Post removed")))
}

/// PUT /api/posts/like/:post_id
async fn like_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(post_id): Path<String>,
) -> ApiResult<Json<DataResponse<Post>>> {
    let post = PostService::like(state.db(), auth.user_id, &post_id).await?;
    Ok(Json(DataResponse::new(post)))
}

/// PUT /api/posts/unlike/:post_id
async fn unlike_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(post_id): Path<String>,
) -> ApiResult<Json<DataResponse<Post>>> {
    let post = PostService::unlike(state.db(), auth.user_id, &post_id).await?;
    Ok(Json(DataResponse::new(post)))
}

/// POST /api/posts/comment/:post_id
async fn add_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(post_id): Path<String>,
    ValidatedJson(req): ValidatedJson<TextRequest>,
) -> ApiResult<Json<DataResponse<Post>>> {
    let post = PostService::comment(state.db(), auth.user_id, &post_id, &req.text).await?;
    Ok(Json(DataResponse::new(post)))
}

/// DELETE /api/posts/comment/:post_id/:comment_id
async fn delete_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((post_id, comment_id)): Path<(String, String)>,
) -> ApiResult<Json<DataResponse<Post>>> {
    let post = PostService::delete_comment(state.db(), auth.user_id, &post_id, &comment_id).await?;
    Ok(Json(DataResponse::new(post)))
}
