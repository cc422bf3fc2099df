//! PostgreSQL implementation of UserRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use recipe_core::entities::User;
use recipe_core::error::DomainError;
use recipe_core::traits::{RepoResult, UserRepository};
use recipe_core::value_objects::Snowflake;

use crate::models::UserModel;

use super::error::{ensure_affected, map_db_error, map_user_violation};

/// A user reacting on new comments during their own deletion gets this many tries
const DELETE_ATTEMPTS: usize = 5;

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(
            r"
            SELECT id, username, email, bio, role, active, created_at, updated_at
            FROM users
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(User::from))
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw: Vec<i64> = ids.iter().map(|id| id.into_inner()).collect();

        let rows = sqlx::query_as::<_, UserModel>(
            r"
            SELECT id, username, email, bio, role, active, created_at, updated_at
            FROM users
            WHERE id = ANY($1)
            ",
        )
        .bind(&raw)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(
            r"
            SELECT id, username, email, bio, role, active, created_at, updated_at
            FROM users
            WHERE LOWER(email) = LOWER($1)
            ",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(User::from))
    }

    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(
            r"
            SELECT id, username, email, bio, role, active, created_at, updated_at
            FROM users
            WHERE username = $1
            ",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(User::from))
    }

    #[instrument(skip(self))]
    async fn username_exists(&self, username: &str) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> RepoResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserModel>(
            r"
            SELECT id, username, email, bio, role, active, created_at, updated_at
            FROM users
            ORDER BY created_at, id
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    #[instrument(skip(self, password_hash), fields(user_id = %user.id))]
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO users (id, username, email, password_hash, bio, role, active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(user.id.into_inner())
        .bind(&user.username)
        .bind(&user.email)
        .bind(password_hash)
        .bind(&user.bio)
        .bind(user.role.as_str())
        .bind(user.active)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_user_violation)?;

        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %user.id))]
    async fn update(&self, user: &User) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET username = $2, email = $3, bio = $4, role = $5, active = $6, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(user.id.into_inner())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.bio)
        .bind(user.role.as_str())
        .bind(user.active)
        .execute(&self.pool)
        .await
        .map_err(map_user_violation)?;

        ensure_affected(result.rows_affected(), || DomainError::UserNotFound(user.id))
    }

    /// Reactions cascade away with the user, so the counters of the
    /// comments they reacted to are reduced first. Those comment rows are
    /// locked in id order before the user row, the same order a
    /// reconciliation takes them, so the retraction never races one. If the
    /// user reacted on a comment outside the locked set meanwhile, the
    /// attempt is rolled back and retried.
    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        for _ in 0..DELETE_ATTEMPTS {
            let mut tx = self.pool.begin().await.map_err(map_db_error)?;

            let locked = sqlx::query_scalar::<_, i64>(
                r"
                SELECT id FROM comments
                WHERE id IN (SELECT comment_id FROM comment_reactions WHERE user_id = $1)
                ORDER BY id
                FOR UPDATE
                ",
            )
            .bind(id.into_inner())
            .fetch_all(&mut *tx)
            .await
            .map_err(map_db_error)?;

            let user = sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE id = $1 FOR UPDATE")
                .bind(id.into_inner())
                .fetch_optional(&mut *tx)
                .await
                .map_err(map_db_error)?;
            if user.is_none() {
                return Err(DomainError::UserNotFound(id));
            }

            let reacted = sqlx::query_scalar::<_, i64>(
                "SELECT comment_id FROM comment_reactions WHERE user_id = $1",
            )
            .bind(id.into_inner())
            .fetch_all(&mut *tx)
            .await
            .map_err(map_db_error)?;
            if reacted.iter().any(|c| locked.binary_search(c).is_err()) {
                tx.rollback().await.map_err(map_db_error)?;
                continue;
            }

            sqlx::query(
                r"
                UPDATE comments c
                SET likes = GREATEST(c.likes - r.likes, 0),
                    dislikes = GREATEST(c.dislikes - r.dislikes, 0)
                FROM (
                    SELECT comment_id,
                           COUNT(*) FILTER (WHERE kind = 'LIKE')::INT AS likes,
                           COUNT(*) FILTER (WHERE kind = 'DISLIKE')::INT AS dislikes
                    FROM comment_reactions
                    WHERE user_id = $1
                    GROUP BY comment_id
                ) r
                WHERE c.id = r.comment_id
                ",
            )
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

            sqlx::query("DELETE FROM users WHERE id = $1")
                .bind(id.into_inner())
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;

            tx.commit().await.map_err(map_db_error)?;
            return Ok(());
        }

        Err(DomainError::InternalError(format!(
            "user {id} kept reacting while being deleted"
        )))
    }

    #[instrument(skip(self))]
    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>> {
        sqlx::query_scalar::<_, String>("SELECT password_hash FROM users WHERE id = $1")
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self, password_hash))]
    async fn update_password(&self, id: Snowflake, password_hash: &str) -> RepoResult<()> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id.into_inner())
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        ensure_affected(result.rows_affected(), || DomainError::UserNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgUserRepository>();
    }
}
