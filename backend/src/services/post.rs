//! Post service - feed, likes and comments

use crate::error::ApiError;
use crate::repositories::{NewEntry, PostRepository, UserRepository, UserRecord};
use devconnector_shared::Post;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

pub const POST_NOT_FOUND_MESSAGE: &str = "Post not found";
pub const NOT_AUTHORIZED_MESSAGE: &str = "User not authorized";

/// Post service for feed operations
pub struct PostService;

impl PostService {
    /// Create a post stamped with the author's name and avatar
    pub async fn create(db: &PgPool, user_id: Uuid, text: &str) -> Result<Post, ApiError> {
        let author = Self::author(db, user_id).await?;

        let post = PostRepository::create(
            db,
            NewEntry {
                user_id,
                text,
                name: &author.name,
                avatar: &author.avatar,
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        info!(post_id = %post.id, %user_id, "post created");
        Ok(post)
    }

    /// All posts, newest first
    pub async fn list(db: &PgPool) -> Result<Vec<Post>, ApiError> {
        PostRepository::list(db).await.map_err(ApiError::Internal)
    }

    /// One post; an unparsable id reads as a missing post
    pub async fn get(db: &PgPool, raw_post_id: &str) -> Result<Post, ApiError> {
        let post_id = parse_post_id(raw_post_id)?;

        PostRepository::find_by_id(db, post_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(post_not_found)
    }

    /// Delete a post; only its author may
    pub async fn delete(db: &PgPool, user_id: Uuid, raw_post_id: &str) -> Result<(), ApiError> {
        let post = Self::get(db, raw_post_id).await?;

        if post.user != user_id {
            return Err(ApiError::Forbidden(NOT_AUTHORIZED_MESSAGE.to_string()));
        }

        PostRepository::delete(db, post.id)
            .await
            .map_err(ApiError::Internal)?;

        info!(post_id = %post.id, %user_id, "post removed");
        Ok(())
    }

    /// Like a post once
    pub async fn like(db: &PgPool, user_id: Uuid, raw_post_id: &str) -> Result<Post, ApiError> {
        let post = Self::get(db, raw_post_id).await?;

        let added = PostRepository::add_like(db, post.id, user_id)
            .await
            .map_err(ApiError::Internal)?;

        if !added {
            return Err(ApiError::BadRequest("Post already liked".to_string()));
        }

        Self::reload(db, post.id).await
    }

    /// Withdraw a like
    pub async fn unlike(db: &PgPool, user_id: Uuid, raw_post_id: &str) -> Result<Post, ApiError> {
        let post = Self::get(db, raw_post_id).await?;

        let removed = PostRepository::remove_like(db, post.id, user_id)
            .await
            .map_err(ApiError::Internal)?;

        if !removed {
            return Err(ApiError::BadRequest(
                "Post has not yet been liked".to_string(),
            ));
        }

        Self::reload(db, post.id).await
    }

    /// Comment on a post
    pub async fn comment(
        db: &PgPool,
        user_id: Uuid,
        raw_post_id: &str,
        text: &str,
    ) -> Result<Post, ApiError> {
        let author = Self::author(db, user_id).await?;
        let post = Self::get(db, raw_post_id).await?;

        PostRepository::add_comment(
            db,
            post.id,
            NewEntry {
                user_id,
                text,
                name: &author.name,
                avatar: &author.avatar,
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        Self::reload(db, post.id).await
    }

    /// Delete a comment; only its author may
    pub async fn delete_comment(
        db: &PgPool,
        user_id: Uuid,
        raw_post_id: &str,
        raw_comment_id: &str,
    ) -> Result<Post, ApiError> {
        let post = Self::get(db, raw_post_id).await?;

        let comment_missing = || ApiError::NotFound("Comment does not exist".to_string());
        let comment_id = Uuid::parse_str(raw_comment_id).map_err(|_| comment_missing())?;
        let comment = post.comment(comment_id).ok_or_else(comment_missing)?;

        if comment.user != user_id {
            return Err(ApiError::Forbidden(NOT_AUTHORIZED_MESSAGE.to_string()));
        }

        PostRepository::delete_comment(db, post.id, comment_id)
            .await
            .map_err(ApiError::Internal)?;

        Self::reload(db, post.id).await
    }

    async fn author(db: &PgPool, user_id: Uuid) -> Result<UserRecord, ApiError> {
        UserRepository::find_by_id(db, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    async fn reload(db: &PgPool, post_id: Uuid) -> Result<Post, ApiError> {
        PostRepository::find_by_id(db, post_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(post_not_found)
    }
}

fn post_not_found() -> ApiError {
    ApiError::NotFound(POST_NOT_FOUND_MESSAGE.to_string())
}

fn parse_post_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| post_not_found())
}
