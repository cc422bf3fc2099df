//! PostgreSQL implementation of the reaction store
//!
//! Reconciliation runs inside a database transaction that starts by taking
//! a row lock on the comment (`SELECT ... FOR UPDATE`). Concurrent reactions
//! on the same comment therefore queue up behind each other, and readers
//! only ever see the reaction row and the counters after commit.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use recipe_core::entities::{Comment, CommentReaction};
use recipe_core::error::DomainError;
use recipe_core::traits::{ReactionRepository, ReactionTransaction, RepoResult};
use recipe_core::value_objects::Snowflake;

use crate::models::{CommentModel, CommentReactionModel};

use super::error::{ensure_affected, map_db_error, map_reaction_violation};

#[derive(Clone)]
pub struct PgReactionRepository {
    pool: PgPool,
}

impl PgReactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReactionRepository for PgReactionRepository {
    #[instrument(skip(self))]
    async fn find(&self, user_id: Snowflake, comment_id: Snowflake) -> RepoResult<Option<CommentReaction>> {
        let result = sqlx::query_as::<_, CommentReactionModel>(
            r"
            SELECT id, user_id, comment_id, kind
            FROM comment_reactions
            WHERE user_id = $1 AND comment_id = $2
            ",
        )
        .bind(user_id.into_inner())
        .bind(comment_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(CommentReaction::try_from).transpose()
    }

    #[instrument(skip(self, comment_ids), fields(count = comment_ids.len()))]
    async fn find_bulk(
        &self,
        user_id: Snowflake,
        comment_ids: &[Snowflake],
    ) -> RepoResult<HashMap<Snowflake, CommentReaction>> {
        if comment_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let raw: Vec<i64> = comment_ids.iter().map(|id| id.into_inner()).collect();

        let rows = sqlx::query_as::<_, CommentReactionModel>(
            r"
            SELECT id, user_id, comment_id, kind
            FROM comment_reactions
            WHERE user_id = $1 AND comment_id = ANY($2)
            ",
        )
        .bind(user_id.into_inner())
        .bind(&raw)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter()
            .map(|row| CommentReaction::try_from(row).map(|r| (r.comment_id, r)))
            .collect()
    }

    async fn begin(&self) -> RepoResult<Box<dyn ReactionTransaction>> {
        let tx = self.pool.begin().await.map_err(map_db_error)?;
        Ok(Box::new(PgReactionTransaction { tx }))
    }
}

/// Open reconciliation transaction; rolled back when dropped uncommitted
pub struct PgReactionTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl ReactionTransaction for PgReactionTransaction {
    #[instrument(skip(self))]
    async fn lock_comment(&mut self, comment_id: Snowflake) -> RepoResult<Option<Comment>> {
        let result = sqlx::query_as::<_, CommentModel>(
            r"
            SELECT id, recipe_id, author_id, text, likes, dislikes, rating, reported,
                   created_at, updated_at
            FROM comments
            WHERE id = $1
            FOR UPDATE
            ",
        )
        .bind(comment_id.into_inner())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Comment::from))
    }

    #[instrument(skip(self))]
    async fn find(&mut self, user_id: Snowflake, comment_id: Snowflake) -> RepoResult<Option<CommentReaction>> {
        let result = sqlx::query_as::<_, CommentReactionModel>(
            r"
            SELECT id, user_id, comment_id, kind
            FROM comment_reactions
            WHERE user_id = $1 AND comment_id = $2
            ",
        )
        .bind(user_id.into_inner())
        .bind(comment_id.into_inner())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        result.map(CommentReaction::try_from).transpose()
    }

    #[instrument(skip(self, reaction), fields(comment_id = %reaction.comment_id, kind = %reaction.kind))]
    async fn create(&mut self, reaction: &CommentReaction) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO comment_reactions (id, user_id, comment_id, kind)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(reaction.id.into_inner())
        .bind(reaction.user_id.into_inner())
        .bind(reaction.comment_id.into_inner())
        .bind(reaction.kind.as_str())
        .execute(&mut *self.tx)
        .await
        .map_err(map_reaction_violation)?;

        Ok(())
    }

    #[instrument(skip(self, reaction), fields(comment_id = %reaction.comment_id, kind = %reaction.kind))]
    async fn update(&mut self, reaction: &CommentReaction) -> RepoResult<()> {
        let result = sqlx::query("UPDATE comment_reactions SET kind = $2 WHERE id = $1")
            .bind(reaction.id.into_inner())
            .bind(reaction.kind.as_str())
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        ensure_affected(result.rows_affected(), || {
            DomainError::InternalError(format!("reaction {} vanished during update", reaction.id))
        })
    }

    #[instrument(skip(self, reaction), fields(comment_id = %reaction.comment_id))]
    async fn delete(&mut self, reaction: &CommentReaction) -> RepoResult<()> {
        sqlx::query("DELETE FROM comment_reactions WHERE id = $1")
            .bind(reaction.id.into_inner())
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, comment), fields(comment_id = %comment.id))]
    async fn save_counters(&mut self, comment: &Comment) -> RepoResult<()> {
        let result = sqlx::query("UPDATE comments SET likes = $2, dislikes = $3 WHERE id = $1")
            .bind(comment.id.into_inner())
            .bind(comment.likes)
            .bind(comment.dislikes)
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        ensure_affected(result.rows_affected(), || DomainError::CommentNotFound(comment.id))
    }

    async fn commit(self: Box<Self>) -> RepoResult<()> {
        self.tx.commit().await.map_err(map_db_error)
    }
}
