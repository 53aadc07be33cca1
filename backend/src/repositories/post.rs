//! Post repository for database operations
//!
//! Likes and comments live in their own tables and are stitched onto the
//! posts after loading. Both lists are returned newest first.

use anyhow::Result;
use chrono::{DateTime, Utc};
use devconnector_shared::{Comment, Like, Post};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

/// Post record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub name: String,
    pub avatar: String,
    pub created_at: DateTime<Utc>,
}

/// Like record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LikeRecord {
    pub post_id: Uuid,
    pub user_id: Uuid,
}

/// Comment record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentRecord {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub name: String,
    pub avatar: String,
    pub created_at: DateTime<Utc>,
}

/// Author-stamped text for a new post or comment
#[derive(Debug, Clone)]
pub struct NewEntry<'a> {
    pub user_id: Uuid,
    pub text: &'a str,
    pub name: &'a str,
    pub avatar: &'a str,
}

/// Attach likes and comments to their posts
///
/// Post order is preserved. Likes and comments keep the order they are
/// given in.
pub fn assemble_posts(
    posts: Vec<PostRecord>,
    likes: Vec<LikeRecord>,
    comments: Vec<CommentRecord>,
) -> Vec<Post> {
    let mut likes_by_post: HashMap<Uuid, Vec<Like>> = HashMap::new();
    for like in likes {
        likes_by_post
            .entry(like.post_id)
            .or_default()
            .push(Like { user: like.user_id });
    }

    let mut comments_by_post: HashMap<Uuid, Vec<Comment>> = HashMap::new();
    for c in comments {
        comments_by_post.entry(c.post_id).or_default().push(Comment {
            id: c.id,
            user: c.user_id,
            text: c.text,
            name: c.name,
            avatar: c.avatar,
            date: c.created_at,
        });
    }

    posts
        .into_iter()
        .map(|p| Post {
            likes: likes_by_post.remove(&p.id).unwrap_or_default(),
            comments: comments_by_post.remove(&p.id).unwrap_or_default(),
            id: p.id,
            user: p.user_id,
            text: p.text,
            name: p.name,
            avatar: p.avatar,
            date: p.created_at,
        })
        .collect()
}

/// Post repository for database operations
pub struct PostRepository;

impl PostRepository {
    /// Create a new post
    pub async fn create(pool: &PgPool, entry: NewEntry<'_>) -> Result<Post> {
        let record = sqlx::query_as::<_, PostRecord>(
            r#"
            INSERT INTO posts (user_id, text, name, avatar)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, text, name, avatar, created_at
            "#,
        )
        .bind(entry.user_id)
        .bind(entry.text)
        .bind(entry.name)
        .bind(entry.avatar)
        .fetch_one(pool)
        .await?;

        assemble_posts(vec![record], vec![], vec![])
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("created post missing"))
    }

    /// List all posts, newest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Post>> {
        let records = sqlx::query_as::<_, PostRecord>(
            r#"
            SELECT id, user_id, text, name, avatar, created_at
            FROM posts
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Self::hydrate(pool, records).await
    }

    /// Find a post with its likes and comments
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Post>> {
        let record = sqlx::query_as::<_, PostRecord>(
            r#"
            SELECT id, user_id, text, name, avatar, created_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        match record {
            Some(record) => Ok(Self::hydrate(pool, vec![record]).await?.into_iter().next()),
            None => Ok(None),
        }
    }

    /// Delete a post; likes and comments cascade
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Record a like; false if the user already liked the post
    pub async fn add_like(pool: &PgPool, post_id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO post_likes (post_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (post_id, user_id) DO NOTHING
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove a like; false if there was none
    pub async fn remove_like(pool: &PgPool, post_id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM post_likes WHERE post_id = $1 AND user_id = $2")
            .bind(post_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Add a comment to a post
    pub async fn add_comment(pool: &PgPool, post_id: Uuid, entry: NewEntry<'_>) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO post_comments (post_id, user_id, text, name, avatar)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(post_id)
        .bind(entry.user_id)
        .bind(entry.text)
        .bind(entry.name)
        .bind(entry.avatar)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Delete a comment from a post
    pub async fn delete_comment(pool: &PgPool, post_id: Uuid, comment_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM post_comments WHERE id = $1 AND post_id = $2")
            .bind(comment_id)
            .bind(post_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn hydrate(pool: &PgPool, records: Vec<PostRecord>) -> Result<Vec<Post>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = records.iter().map(|r| r.id).collect();

        let likes = sqlx::query_as::<_, LikeRecord>(
            r#"
            SELECT post_id, user_id
            FROM post_likes
            WHERE post_id = ANY($1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(&ids)
        .fetch_all(pool)
        .await?;

        let comments = sqlx::query_as::<_, CommentRecord>(
            r#"
            SELECT id, post_id, user_id, text, name, avatar, created_at
            FROM post_comments
            WHERE post_id = ANY($1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(&ids)
        .fetch_all(pool)
        .await?;

        Ok(assemble_posts(records, likes, comments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: Uuid, user_id: Uuid) -> PostRecord {
        PostRecord {
            id,
            user_id,
            text: "hello".to_string(),
            name: "Ada".to_string(),
            avatar: String::new(),
            created_at: Utc::now(),
        }
    }

    fn comment(post_id: Uuid, text: &str) -> CommentRecord {
        CommentRecord {
            id: Uuid::new_v4(),
            post_id,
            user_id: Uuid::new_v4(),
            text: text.to_string(),
            name: "Grace".to_string(),
            avatar: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_assemble_keeps_post_order() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let author = Uuid::new_v4();

        let posts = assemble_posts(vec![post(a, author), post(b, author)], vec![], vec![]);

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id, a);
        assert_eq!(posts[1].id, b);
        assert!(posts[0].likes.is_empty());
        assert!(posts[0].comments.is_empty());
    }

    #[test]
    fn test_assemble_attaches_to_right_post() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let liker = Uuid::new_v4();

        let posts = assemble_posts(
            vec![post(a, Uuid::new_v4()), post(b, Uuid::new_v4())],
            vec![LikeRecord {
                post_id: b,
                user_id: liker,
            }],
            vec![comment(a, "newer"), comment(a, "older")],
        );

        assert!(posts[0].likes.is_empty());
        assert!(posts[1].is_liked_by(liker));
        assert_eq!(posts[0].comments.len(), 2);
        assert_eq!(posts[0].comments[0].text, "newer");
        assert!(posts[1].comments.is_empty());
    }

    #[test]
    fn test_assemble_drops_orphans() {
        let a = Uuid::new_v4();
        let posts = assemble_posts(
            vec![post(a, Uuid::new_v4())],
            vec![LikeRecord {
                post_id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
            }],
            vec![],
        );

        assert!(posts[0].likes.is_empty());
    }
}
