//! Profile service - business logic for developer profiles

use crate::error::ApiError;
use crate::repositories::{ProfileRepository, ProfileSection, UpsertProfile, UserRepository};
use devconnector_shared::validation::{non_empty, parse_skills};
use devconnector_shared::{
    Education, EducationRequest, Experience, ExperienceRequest, Profile, ProfileRequest, Social,
};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

pub const NO_PROFILE_MESSAGE: &str = "There is no profile for this user";
pub const PROFILE_NOT_FOUND_MESSAGE: &str = "Profile not found";

/// Outcome of a create-or-update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertAction {
    Created,
    Updated,
}

impl UpsertAction {
    pub fn as_str(self) -> &'static str {
        match self {
            UpsertAction::Created => "Create new profile",
            UpsertAction::Updated => "Profile update",
        }
    }
}

impl From<ProfileRequest> for UpsertProfile {
    fn from(req: ProfileRequest) -> Self {
        UpsertProfile {
            status: req.status,
            skills: parse_skills(&req.skills),
            company: non_empty(req.company),
            website: non_empty(req.website),
            location: non_empty(req.location),
            bio: non_empty(req.bio),
            githubusername: non_empty(req.githubusername),
            social: Social {
                youtube: non_empty(req.youtube),
                twitter: non_empty(req.twitter),
                facebook: non_empty(req.facebook),
                linkedin: non_empty(req.linkedin),
                instagram: non_empty(req.instagram),
            },
        }
    }
}

/// Build a new experience entry from a validated request
pub fn experience_from(req: ExperienceRequest) -> Result<Experience, ApiError> {
    let from = req
        .from
        .ok_or_else(|| ApiError::BadRequest("From is required".to_string()))?;

    Ok(Experience {
        id: Uuid::new_v4(),
        title: req.title,
        company: req.company,
        location: non_empty(req.location),
        from,
        to: req.to,
        current: req.current,
        description: non_empty(req.description),
    })
}

/// Build a new education entry from a validated request
pub fn education_from(req: EducationRequest) -> Result<Education, ApiError> {
    let from = req
        .from
        .ok_or_else(|| ApiError::BadRequest("From is required".to_string()))?;

    Ok(Education {
        id: Uuid::new_v4(),
        school: req.school,
        degree: req.degree,
        fieldofstudy: req.fieldofstudy,
        from,
        to: req.to,
        current: req.current,
        description: non_empty(req.description),
    })
}

/// Profile service for profile operations
pub struct ProfileService;

impl ProfileService {
    /// The caller's own profile
    pub async fn get_own(db: &PgPool, user_id: Uuid) -> Result<Profile, ApiError> {
        ProfileRepository::find_by_user(db, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound(NO_PROFILE_MESSAGE.to_string()))
    }

    /// Create or update the caller's profile
    pub async fn upsert(
        db: &PgPool,
        user_id: Uuid,
        req: ProfileRequest,
    ) -> Result<(Profile, UpsertAction), ApiError> {
        let (profile, created) = ProfileRepository::upsert(db, user_id, req.into())
            .await
            .map_err(ApiError::Internal)?;

        let action = if created {
            UpsertAction::Created
        } else {
            UpsertAction::Updated
        };
        info!(%user_id, action = action.as_str(), "profile saved");

        Ok((profile, action))
    }

    /// All profiles
    pub async fn list(db: &PgPool) -> Result<Vec<Profile>, ApiError> {
        ProfileRepository::list(db)
            .await
            .map_err(ApiError::Internal)
    }

    /// Profile of any user; an unparsable id reads as a missing profile
    pub async fn get_by_user(db: &PgPool, raw_user_id: &str) -> Result<Profile, ApiError> {
        let not_found = || ApiError::BadRequest(PROFILE_NOT_FOUND_MESSAGE.to_string());

        let user_id = Uuid::parse_str(raw_user_id).map_err(|_| not_found())?;

        ProfileRepository::find_by_user(db, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(not_found)
    }

    /// Delete the caller's posts, profile and account
    pub async fn delete_account(db: &PgPool, user_id: Uuid) -> Result<(), ApiError> {
        let deleted = UserRepository::delete_account(db, user_id)
            .await
            .map_err(ApiError::Internal)?;

        if !deleted {
            return Err(ApiError::NotFound("User not found".to_string()));
        }

        info!(%user_id, "account deleted");
        Ok(())
    }

    /// Add an experience entry at the front of the caller's list
    pub async fn add_experience(
        db: &PgPool,
        user_id: Uuid,
        req: ExperienceRequest,
    ) -> Result<Profile, ApiError> {
        let entry = experience_from(req)?;

        ProfileRepository::prepend_experience(db, user_id, &entry)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound(NO_PROFILE_MESSAGE.to_string()))
    }

    /// Add an education entry at the front of the caller's list
    pub async fn add_education(
        db: &PgPool,
        user_id: Uuid,
        req: EducationRequest,
    ) -> Result<Profile, ApiError> {
        let entry = education_from(req)?;

        ProfileRepository::prepend_education(db, user_id, &entry)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound(NO_PROFILE_MESSAGE.to_string()))
    }

    /// Remove an experience or education entry by id
    pub async fn remove_entry(
        db: &PgPool,
        user_id: Uuid,
        section: ProfileSection,
        raw_entry_id: &str,
    ) -> Result<Profile, ApiError> {
        let entry_id = Uuid::parse_str(raw_entry_id).map_err(|_| {
            let label = match section {
                ProfileSection::Experience => "Experience not found",
                ProfileSection::Education => "Education not found",
            };
            ApiError::BadRequest(label.to_string())
        })?;

        ProfileRepository::remove_entry(db, user_id, section, entry_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound(NO_PROFILE_MESSAGE.to_string()))
    }
}
