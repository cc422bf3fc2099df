//! PostgreSQL implementation of CommentRepository
//!
//! Counter columns are written only by the reaction transaction.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use recipe_core::entities::Comment;
use recipe_core::error::DomainError;
use recipe_core::traits::{CommentRepository, RepoResult};
use recipe_core::value_objects::Snowflake;

use crate::models::CommentModel;

use super::error::{ensure_affected, map_db_error};

#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Comment>> {
        let result = sqlx::query_as::<_, CommentModel>(
            r"
            SELECT id, recipe_id, author_id, text, likes, dislikes, rating, reported,
                   created_at, updated_at
            FROM comments
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Comment::from))
    }

    #[instrument(skip(self))]
    async fn find_by_recipe(&self, recipe_id: Snowflake) -> RepoResult<Vec<Comment>> {
        let rows = sqlx::query_as::<_, CommentModel>(
            r"
            SELECT id, recipe_id, author_id, text, likes, dislikes, rating, reported,
                   created_at, updated_at
            FROM comments
            WHERE recipe_id = $1
            ORDER BY created_at ASC, id ASC
            ",
        )
        .bind(recipe_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> RepoResult<Vec<Comment>> {
        let rows = sqlx::query_as::<_, CommentModel>(
            r"
            SELECT id, recipe_id, author_id, text, likes, dislikes, rating, reported,
                   created_at, updated_at
            FROM comments
            ORDER BY created_at DESC, id DESC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }

    #[instrument(skip(self, comment), fields(comment_id = %comment.id))]
    async fn create(&self, comment: &Comment) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO comments (id, recipe_id, author_id, text, likes, dislikes, rating, reported,
                                  created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(comment.id.into_inner())
        .bind(comment.recipe_id.into_inner())
        .bind(comment.author_id.into_inner())
        .bind(&comment.text)
        .bind(comment.likes)
        .bind(comment.dislikes)
        .bind(comment.rating)
        .bind(comment.reported)
        .bind(comment.created_at)
        .bind(comment.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, comment), fields(comment_id = %comment.id))]
    async fn update_text(&self, comment: &Comment) -> RepoResult<()> {
        let result = sqlx::query("UPDATE comments SET text = $2, updated_at = NOW() WHERE id = $1")
            .bind(comment.id.into_inner())
            .bind(&comment.text)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        ensure_affected(result.rows_affected(), || DomainError::CommentNotFound(comment.id))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        ensure_affected(result.rows_affected(), || DomainError::CommentNotFound(id))
    }

    #[instrument(skip(self))]
    async fn set_reported(&self, id: Snowflake, reported: bool) -> RepoResult<()> {
        let result = sqlx::query("UPDATE comments SET reported = $2 WHERE id = $1")
            .bind(id.into_inner())
            .bind(reported)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        ensure_affected(result.rows_affected(), || DomainError::CommentNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgCommentRepository>();
    }
}
