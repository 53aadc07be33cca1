//! Profile repository for database operations
//!
//! Experience, education and social links are stored as JSONB documents on
//! the profile row; skills are a `TEXT[]`.

use anyhow::Result;
use chrono::{DateTime, Utc};
use devconnector_shared::{Education, Experience, Profile, ProfileOwner, Social};
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

const PROFILE_COLUMNS: &str = r#"
    p.id, p.user_id, u.name AS user_name, u.avatar AS user_avatar,
    p.company, p.website, p.location, p.status, p.skills, p.bio,
    p.githubusername, p.social, p.experience, p.education, p.created_at
"#;

/// Profile row joined with its owner's name and avatar
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_avatar: String,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub status: String,
    pub skills: Vec<String>,
    pub bio: Option<String>,
    pub githubusername: Option<String>,
    pub social: Json<Social>,
    pub experience: Json<Vec<Experience>>,
    pub education: Json<Vec<Education>>,
    pub created_at: DateTime<Utc>,
}

impl From<ProfileRecord> for Profile {
    fn from(record: ProfileRecord) -> Self {
        Profile {
            id: record.id,
            user: ProfileOwner {
                id: record.user_id,
                name: record.user_name,
                avatar: record.user_avatar,
            },
            company: record.company,
            website: record.website,
            location: record.location,
            status: record.status,
            skills: record.skills,
            bio: record.bio,
            githubusername: record.githubusername,
            social: record.social.0,
            experience: record.experience.0,
            education: record.education.0,
            date: record.created_at,
        }
    }
}

/// Input for creating or updating a profile
///
/// `None` keeps the stored value on update. `social` always replaces the
/// stored links.
#[derive(Debug, Clone, Default)]
pub struct UpsertProfile {
    pub status: String,
    pub skills: Vec<String>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub githubusername: Option<String>,
    pub social: Social,
}

/// JSONB list columns on a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSection {
    Experience,
    Education,
}

impl ProfileSection {
    fn column(self) -> &'static str {
        match self {
            ProfileSection::Experience => "experience",
            ProfileSection::Education => "education",
        }
    }
}

/// Profile repository for database operations
pub struct ProfileRepository;

impl ProfileRepository {
    /// Find the profile owned by a user
    pub async fn find_by_user(pool: &PgPool, user_id: Uuid) -> Result<Option<Profile>> {
        let query = format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles p JOIN users u ON u.id = p.user_id WHERE p.user_id = $1"
        );

        let record = sqlx::query_as::<_, ProfileRecord>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        Ok(record.map(Profile::from))
    }

    /// List all profiles, oldest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Profile>> {
        let query = format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles p JOIN users u ON u.id = p.user_id ORDER BY p.created_at ASC"
        );

        let records = sqlx::query_as::<_, ProfileRecord>(&query)
            .fetch_all(pool)
            .await?;

        Ok(records.into_iter().map(Profile::from).collect())
    }

    /// Create the user's profile, or update it if one exists
    ///
    /// Returns the stored profile and whether it was newly created.
    pub async fn upsert(
        pool: &PgPool,
        user_id: Uuid,
        input: UpsertProfile,
    ) -> Result<(Profile, bool)> {
        let (profile_id, created) = sqlx::query_as::<_, (Uuid, bool)>(
            r#"
            INSERT INTO profiles
                (user_id, status, skills, company, website, location, bio, githubusername, social)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (user_id) DO UPDATE SET
                status = EXCLUDED.status,
                skills = EXCLUDED.skills,
                company = COALESCE(EXCLUDED.company, profiles.company),
                website = COALESCE(EXCLUDED.website, profiles.website),
                location = COALESCE(EXCLUDED.location, profiles.location),
                bio = COALESCE(EXCLUDED.bio, profiles.bio),
                githubusername = COALESCE(EXCLUDED.githubusername, profiles.githubusername),
                social = EXCLUDED.social
            RETURNING id, (xmax = 0) AS created
            "#,
        )
        .bind(user_id)
        .bind(&input.status)
        .bind(&input.skills)
        .bind(&input.company)
        .bind(&input.website)
        .bind(&input.location)
        .bind(&input.bio)
        .bind(&input.githubusername)
        .bind(Json(&input.social))
        .fetch_one(pool)
        .await?;

        let profile = Self::find_by_user(pool, user_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("profile {} vanished after upsert", profile_id))?;

        Ok((profile, created))
    }

    /// Add an experience entry to the front of the list
    ///
    /// Returns `None` when the user has no profile.
    pub async fn prepend_experience(
        pool: &PgPool,
        user_id: Uuid,
        entry: &Experience,
    ) -> Result<Option<Profile>> {
        let entry = serde_json::to_value(entry)?;
        Self::prepend(pool, user_id, ProfileSection::Experience, entry).await
    }

    /// Add an education entry to the front of the list
    pub async fn prepend_education(
        pool: &PgPool,
        user_id: Uuid,
        entry: &Education,
    ) -> Result<Option<Profile>> {
        let entry = serde_json::to_value(entry)?;
        Self::prepend(pool, user_id, ProfileSection::Education, entry).await
    }

    async fn prepend(
        pool: &PgPool,
        user_id: Uuid,
        section: ProfileSection,
        entry: serde_json::Value,
    ) -> Result<Option<Profile>> {
        let column = section.column();
        let query = format!(
            "UPDATE profiles SET {column} = jsonb_build_array($2::jsonb) || {column} WHERE user_id = $1"
        );

        let updated = sqlx::query(&query)
            .bind(user_id)
            .bind(Json(entry))
            .execute(pool)
            .await?
            .rows_affected();

        if updated == 0 {
            return Ok(None);
        }

        Self::find_by_user(pool, user_id).await
    }

    /// Remove the entry with the given id from a section, keeping order
    ///
    /// Removing an id that is not present leaves the list unchanged.
    pub async fn remove_entry(
        pool: &PgPool,
        user_id: Uuid,
        section: ProfileSection,
        entry_id: Uuid,
    ) -> Result<Option<Profile>> {
        let column = section.column();
        let query = format!(
            r#"
            UPDATE profiles SET {column} = COALESCE(
                (SELECT jsonb_agg(e ORDER BY i)
                 FROM jsonb_array_elements({column}) WITH ORDINALITY AS t(e, i)
                 WHERE e->>'id' <> $2),
                '[]'::jsonb)
            WHERE user_id = $1
            "#
        );

        let updated = sqlx::query(&query)
            .bind(user_id)
            .bind(entry_id.to_string())
            .execute(pool)
            .await?
            .rows_affected();

        if updated == 0 {
            return Ok(None);
        }

        Self::find_by_user(pool, user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_section_columns() {
        assert_eq!(ProfileSection::Experience.column(), "experience");
        assert_eq!(ProfileSection::Education.column(), "education");
    }

    #[test]
    fn test_record_into_profile() {
        let user_id = Uuid::new_v4();
        let exp = Experience {
            id: Uuid::new_v4(),
            title: "Engineer".to_string(),
            company: "Acme".to_string(),
            location: None,
            from: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            to: None,
            current: true,
            description: None,
        };

        let record = ProfileRecord {
            id: Uuid::new_v4(),
            user_id,
            user_name: "Ada".to_string(),
            user_avatar: "avatar".to_string(),
            company: None,
            website: None,
            location: None,
            status: "Developer".to_string(),
            skills: vec!["rust".to_string()],
            bio: None,
            githubusername: None,
            social: Json(Social::default()),
            experience: Json(vec![exp.clone()]),
            education: Json(vec![]),
            created_at: Utc::now(),
        };

        let profile = Profile::from(record);
        assert_eq!(profile.user.id, user_id);
        assert_eq!(profile.user.name, "Ada");
        assert_eq!(profile.experience, vec![exp]);
    }
}
