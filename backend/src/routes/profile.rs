//! Developer profile routes

use super::extract::ValidatedJson;
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::repositories::ProfileSection;
use crate::services::ProfileService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::{delete, get, put},
    Json, Router,
};
use devconnector_shared::{
    DataResponse, EducationRequest, ExperienceRequest, MessageResponse, Profile, ProfileRequest,
};

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_profiles).post(upsert_profile).delete(delete_account),
        )
        .route("/me", get(get_own_profile))
        .route("/user/:user_id", get(get_profile_by_user))
        .route("/experience", put(add_experience))
        .route("/experience/:exp_id", delete(remove_experience))
        .route("/education", put(add_education))
        .route("/education/:edu_id", delete(remove_education))
        .route("/github/:username", get(github_repos))
}

/// GET /api/profile/me
async fn get_own_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<DataResponse<Profile>>> {
    let profile = ProfileService::get_own(state.db(), auth.user_id).await?;
    Ok(Json(DataResponse::new(profile)))
}

/// POST /api/profile
async fn upsert_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<ProfileRequest>,
) -> ApiResult<Json<DataResponse<Profile>>> {
    let (profile, action) = ProfileService::upsert(state.db(), auth.user_id, req).await?;
    Ok(Json(DataResponse::new(profile).with_action(action.as_str())))
}

/// GET /api/profile
async fn list_profiles(
    State(state): State<AppState>,
) -> ApiResult<Json<DataResponse<Vec<Profile>>>> {
    let profiles = ProfileService::list(state.db()).await?;
    Ok(Json(DataResponse::list(profiles)))
}

/// GET /api/profile/user/:user_id
async fn get_profile_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<DataResponse<Profile>>> {
    let profile = ProfileService::get_by_user(state.db(), &user_id).await?;
    Ok(Json(DataResponse::new(profile)))
}

/// DELETE /api/profile
async fn delete_account(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<MessageResponse>> {
    ProfileService::delete_account(state.db(), auth.user_id).await?;
    Ok(Json(MessageResponse::new("User deleted")))
}

/// PUT /api/profile/experience
async fn add_experience(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<ExperienceRequest>,
) -> ApiResult<Json<DataResponse<Profile>>> {
    let profile = ProfileService::add_experience(state.db(), auth.user_id, req).await?;
    Ok(Json(DataResponse::new(profile)))
}

/// DELETE /api/profile/experience/:exp_id
async fn remove_experience(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(exp_id): Path<String>,
) -> ApiResult<Json<DataResponse<Profile>>> {
    let profile =
        ProfileService::remove_entry(state.db(), auth.user_id, ProfileSection::Experience, &exp_id)
            .await?;
    Ok(Json(DataResponse::new(profile)))
}

/// PUT /api/profile/education
async fn add_education(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<EducationRequest>,
) -> ApiResult<Json<DataResponse<Profile>>> {
    let profile = ProfileService::add_education(state.db(), auth.user_id, req).await?;
    Ok(Json(DataResponse::new(profile)))
}

/// DELETE /api/profile/education/:edu_id
async fn remove_education(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(edu_id): Path<String>,
) -> ApiResult<Json<DataResponse<Profile>>> {
    let profile =
        ProfileService::remove_entry(state.db(), auth.user_id, ProfileSection::Education, &edu_id)
            .await?;
    Ok(Json(DataResponse::new(profile)))
}

/// GET /api/profile/github/:username
async fn github_repos(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<DataResponse<Vec<serde_json::Value>>>> {
    let repos = state.github().repos(&username).await?;
    Ok(Json(DataResponse::list(repos)))
}
