//! PostgreSQL implementation of RecipeRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use recipe_core::entities::{Recipe, RecipeFilter, RecipeStats};
use recipe_core::error::DomainError;
use recipe_core::traits::{RecipeRepository, RepoResult};
use recipe_core::value_objects::Snowflake;

use crate::models::{RecipeModel, RecipeStatsModel};

use super::error::{ensure_affected, map_db_error};

#[derive(Clone)]
pub struct PgRecipeRepository {
    pool: PgPool,
}

impl PgRecipeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escape LIKE wildcards so user input matches literally
fn like_pattern(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push('%');
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl RecipeRepository for PgRecipeRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Recipe>> {
        let result = sqlx::query_as::<_, RecipeModel>(
            r"
            SELECT id, owner_id, title, description, time_in_mins, prep_time, cook_time, servings,
                   rating, cuisine, meal_type, diet, main_ingredient, ingredients, instructions,
                   active, created_at, updated_at
            FROM recipes
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Recipe::from))
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<Recipe>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw: Vec<i64> = ids.iter().map(|id| id.into_inner()).collect();

        let rows = sqlx::query_as::<_, RecipeModel>(
            r"
            SELECT id, owner_id, title, description, time_in_mins, prep_time, cook_time, servings,
                   rating, cuisine, meal_type, diet, main_ingredient, ingredients, instructions,
                   active, created_at, updated_at
            FROM recipes
            WHERE id = ANY($1)
            ",
        )
        .bind(&raw)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Recipe::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> RepoResult<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, RecipeModel>(
            r"
            SELECT id, owner_id, title, description, time_in_mins, prep_time, cook_time, servings,
                   rating, cuisine, meal_type, diet, main_ingredient, ingredients, instructions,
                   active, created_at, updated_at
            FROM recipes
            ORDER BY created_at DESC, id DESC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Recipe::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_owner(&self, owner_id: Snowflake) -> RepoResult<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, RecipeModel>(
            r"
            SELECT id, owner_id, title, description, time_in_mins, prep_time, cook_time, servings,
                   rating, cuisine, meal_type, diet, main_ingredient, ingredients, instructions,
                   active, created_at, updated_at
            FROM recipes
            WHERE owner_id = $1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(owner_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Recipe::from).collect())
    }

    #[instrument(skip(self))]
    async fn search(&self, filter: &RecipeFilter) -> RepoResult<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, RecipeModel>(
            r"
            SELECT id, owner_id, title, description, time_in_mins, prep_time, cook_time, servings,
                   rating, cuisine, meal_type, diet, main_ingredient, ingredients, instructions,
                   active, created_at, updated_at
            FROM recipes
            WHERE ($1::TEXT IS NULL OR title ILIKE $1)
              AND ($2::TEXT IS NULL OR LOWER(cuisine) = LOWER($2))
              AND ($3::TEXT IS NULL OR LOWER(meal_type) = LOWER($3))
              AND ($4::TEXT IS NULL OR LOWER(diet) = LOWER($4))
              AND ($5::TEXT IS NULL OR LOWER(main_ingredient) = LOWER($5))
              AND ($6::FLOAT8 IS NULL OR rating >= $6)
              AND ($7::INT IS NULL OR time_in_mins <= $7)
              AND ($8::INT IS NULL OR servings = $8)
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(filter.title.as_deref().map(like_pattern))
        .bind(&filter.cuisine)
        .bind(&filter.meal_type)
        .bind(&filter.diet)
        .bind(&filter.main_ingredient)
        .bind(filter.min_rating)
        .bind(filter.max_cooking_time)
        .bind(filter.servings)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Recipe::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_top_rated(&self, limit: i64) -> RepoResult<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, RecipeModel>(
            r"
            SELECT id, owner_id, title, description, time_in_mins, prep_time, cook_time, servings,
                   rating, cuisine, meal_type, diet, main_ingredient, ingredients, instructions,
                   active, created_at, updated_at
            FROM recipes
            ORDER BY rating DESC, created_at DESC
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Recipe::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_random(&self, limit: i64, exclude: Option<Snowflake>) -> RepoResult<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, RecipeModel>(
            r"
            SELECT id, owner_id, title, description, time_in_mins, prep_time, cook_time, servings,
                   rating, cuisine, meal_type, diet, main_ingredient, ingredients, instructions,
                   active, created_at, updated_at
            FROM recipes
            WHERE ($2::BIGINT IS NULL OR id <> $2)
            ORDER BY RANDOM()
            LIMIT $1
            ",
        )
        .bind(limit)
        .bind(exclude.map(Snowflake::into_inner))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Recipe::from).collect())
    }

    #[instrument(skip(self, recipe), fields(recipe_id = %recipe.id))]
    async fn create(&self, recipe: &Recipe) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO recipes (id, owner_id, title, description, time_in_mins, prep_time, cook_time,
                                 servings, rating, cuisine, meal_type, diet, main_ingredient,
                                 ingredients, instructions, active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            ",
        )
        .bind(recipe.id.into_inner())
        .bind(recipe.owner_id.into_inner())
        .bind(&recipe.title)
        .bind(&recipe.description)
        .bind(recipe.time_in_mins)
        .bind(recipe.prep_time)
        .bind(recipe.cook_time)
        .bind(recipe.servings)
        .bind(recipe.rating)
        .bind(&recipe.cuisine)
        .bind(&recipe.meal_type)
        .bind(&recipe.diet)
        .bind(&recipe.main_ingredient)
        .bind(&recipe.ingredients)
        .bind(&recipe.instructions)
        .bind(recipe.active)
        .bind(recipe.created_at)
        .bind(recipe.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, recipe), fields(recipe_id = %recipe.id))]
    async fn update(&self, recipe: &Recipe) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE recipes
            SET title = $2, description = $3, time_in_mins = $4, prep_time = $5, cook_time = $6,
                servings = $7, cuisine = $8, meal_type = $9, diet = $10, main_ingredient = $11,
                ingredients = $12, instructions = $13, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(recipe.id.into_inner())
        .bind(&recipe.title)
        .bind(&recipe.description)
        .bind(recipe.time_in_mins)
        .bind(recipe.prep_time)
        .bind(recipe.cook_time)
        .bind(recipe.servings)
        .bind(&recipe.cuisine)
        .bind(&recipe.meal_type)
        .bind(&recipe.diet)
        .bind(&recipe.main_ingredient)
        .bind(&recipe.ingredients)
        .bind(&recipe.instructions)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        ensure_affected(result.rows_affected(), || DomainError::RecipeNotFound(recipe.id))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        ensure_affected(result.rows_affected(), || DomainError::RecipeNotFound(id))
    }

    #[instrument(skip(self))]
    async fn set_active(&self, id: Snowflake, active: bool) -> RepoResult<()> {
        let result = sqlx::query("UPDATE recipes SET active = $2, updated_at = NOW() WHERE id = $1")
            .bind(id.into_inner())
            .bind(active)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        ensure_affected(result.rows_affected(), || DomainError::RecipeNotFound(id))
    }

    #[instrument(skip(self))]
    async fn update_rating(&self, id: Snowflake, rating: f64) -> RepoResult<()> {
        let result = sqlx::query("UPDATE recipes SET rating = $2, updated_at = NOW() WHERE id = $1")
            .bind(id.into_inner())
            .bind(rating)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        ensure_affected(result.rows_affected(), || DomainError::RecipeNotFound(id))
    }

    #[instrument(skip(self))]
    async fn stats(&self) -> RepoResult<RecipeStats> {
        let row = sqlx::query_as::<_, RecipeStatsModel>(
            r"
            SELECT COUNT(*) AS total, COUNT(*) FILTER (WHERE active) AS published
            FROM recipes
            ",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn save_for_user(&self, user_id: Snowflake, recipe_id: Snowflake) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO user_saved_recipes (user_id, recipe_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, recipe_id) DO NOTHING
            ",
        )
        .bind(user_id.into_inner())
        .bind(recipe_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn unsave_for_user(&self, user_id: Snowflake, recipe_id: Snowflake) -> RepoResult<()> {
        sqlx::query("DELETE FROM user_saved_recipes WHERE user_id = $1 AND recipe_id = $2")
            .bind(user_id.into_inner())
            .bind(recipe_id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn is_saved_by_user(&self, user_id: Snowflake, recipe_id: Snowflake) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM user_saved_recipes WHERE user_id = $1 AND recipe_id = $2)",
        )
        .bind(user_id.into_inner())
        .bind(recipe_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn find_saved_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, RecipeModel>(
            r"
            SELECT r.id, r.owner_id, r.title, r.description, r.time_in_mins, r.prep_time,
                   r.cook_time, r.servings, r.rating, r.cuisine, r.meal_type, r.diet,
                   r.main_ingredient, r.ingredients, r.instructions, r.active, r.created_at,
                   r.updated_at
            FROM user_saved_recipes s
            JOIN recipes r ON r.id = s.recipe_id
            WHERE s.user_id = $1
            ORDER BY s.saved_at DESC
            ",
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Recipe::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("pasta"), "%pasta%");
        assert_eq!(like_pattern("100%_rye"), "%100\\%\\_rye%");
    }

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgRecipeRepository>();
    }
}
