//! Recipe service
//!
//! CRUD, search, suggestions, random picks and rating.

use recipe_core::entities::{Recipe, RecipeFilter};
use recipe_core::Snowflake;
use tracing::{info, instrument};

use crate::dto::{CreateRecipeRequest, RecipeFilterRequest, RecipeResponse, UpdateRecipeRequest};

use super::access::AccessService;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Number of recipes in the suggestion list
pub const SUGGESTED_LIMIT: i64 = 6;
/// Default and maximum size of a random selection
pub const RANDOM_DEFAULT_LIMIT: i64 = 10;
pub const RANDOM_MAX_LIMIT: i64 = 50;

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn clean_lines(lines: Vec<String>) -> Vec<String> {
    lines
        .into_iter()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

fn into_responses(recipes: Vec<Recipe>) -> Vec<RecipeResponse> {
    recipes.into_iter().map(RecipeResponse::from).collect()
}

/// Recipe service
pub struct RecipeService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RecipeService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self))]
    pub async fn list_recipes(&self) -> ServiceResult<Vec<RecipeResponse>> {
        Ok(into_responses(self.ctx.recipe_repo().find_all().await?))
    }

    #[instrument(skip(self))]
    pub async fn get_recipe(&self, recipe_id: Snowflake) -> ServiceResult<RecipeResponse> {
        Ok(self.find_recipe(recipe_id).await?.into())
    }

    /// Create a recipe owned by `owner_id`; it starts unrated and unpublished
    #[instrument(skip(self, request), fields(title = %request.title))]
    pub async fn create_recipe(
        &self,
        owner_id: Snowflake,
        request: CreateRecipeRequest,
    ) -> ServiceResult<RecipeResponse> {
        AccessService::new(self.ctx).require_actor(owner_id).await?;

        let title = request.title.trim().to_string();
        if title.is_empty() {
            return Err(ServiceError::validation("Title cannot be blank"));
        }

        let mut recipe = Recipe::new(
            self.ctx.generate_id(),
            owner_id,
            title,
            request.time_in_mins,
            request.servings,
        );
        recipe.description = blank_to_none(request.description);
        recipe.prep_time = request.prep_time;
        recipe.cook_time = request.cook_time;
        recipe.cuisine = blank_to_none(request.cuisine);
        recipe.meal_type = blank_to_none(request.meal_type);
        recipe.diet = blank_to_none(request.diet);
        recipe.main_ingredient = blank_to_none(request.main_ingredient);
        recipe.ingredients = clean_lines(request.ingredients);
        recipe.instructions = clean_lines(request.instructions);

        self.ctx.recipe_repo().create(&recipe).await?;

        info!(recipe_id = %recipe.id, owner_id = %owner_id, "Recipe created");
        Ok(recipe.into())
    }

    /// Update a recipe (owner only)
    #[instrument(skip(self, request))]
    pub async fn update_recipe(
        &self,
        recipe_id: Snowflake,
        actor_id: Snowflake,
        request: UpdateRecipeRequest,
    ) -> ServiceResult<RecipeResponse> {
        let access = AccessService::new(self.ctx);
        let actor = access.require_actor(actor_id).await?;
        let mut recipe = self.find_recipe(recipe_id).await?;
        access.ensure_recipe_owner(&actor, &recipe)?;

        if let Some(title) = request.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(ServiceError::validation("Title cannot be blank"));
            }
            recipe.title = title;
        }
        if let Some(description) = request.description {
            recipe.description = blank_to_none(Some(description));
        }
        if let Some(time) = request.time_in_mins {
            recipe.time_in_mins = time;
        }
        if request.prep_time.is_some() {
            recipe.prep_time = request.prep_time;
        }
        if request.cook_time.is_some() {
            recipe.cook_time = request.cook_time;
        }
        if let Some(servings) = request.servings {
            recipe.servings = servings;
        }
        for (field, value) in [
            (&mut recipe.cuisine, request.cuisine),
            (&mut recipe.meal_type, request.meal_type),
            (&mut recipe.diet, request.diet),
            (&mut recipe.main_ingredient, request.main_ingredient),
        ] {
            if value.is_some() {
                *field = blank_to_none(value);
            }
        }
        if let Some(ingredients) = request.ingredients {
            recipe.ingredients = clean_lines(ingredients);
        }
        if let Some(instructions) = request.instructions {
            recipe.instructions = clean_lines(instructions);
        }
        recipe.touch();

        self.ctx.recipe_repo().update(&recipe).await?;

        info!(recipe_id = %recipe_id, "Recipe updated");
        Ok(self.find_recipe(recipe_id).await?.into())
    }

    /// Delete a recipe (owner or ADMIN); comments and reactions cascade
    #[instrument(skip(self))]
    pub async fn delete_recipe(&self, recipe_id: Snowflake, actor_id: Snowflake) -> ServiceResult<()> {
        let access = AccessService::new(self.ctx);
        let actor = access.require_actor(actor_id).await?;
        let recipe = self.find_recipe(recipe_id).await?;
        access.ensure_recipe_manager(&actor, &recipe)?;

        self.ctx.recipe_repo().delete(recipe_id).await?;

        info!(recipe_id = %recipe_id, actor_id = %actor_id, "Recipe deleted");
        Ok(())
    }

    /// Recipes matching every supplied criterion
    #[instrument(skip(self, request))]
    pub async fn search(&self, request: RecipeFilterRequest) -> ServiceResult<Vec<RecipeResponse>> {
        let filter = RecipeFilter::from(request);
        Ok(into_responses(self.ctx.recipe_repo().search(&filter).await?))
    }

    /// Highest rated recipes
    #[instrument(skip(self))]
    pub async fn suggested(&self) -> ServiceResult<Vec<RecipeResponse>> {
        Ok(into_responses(
            self.ctx.recipe_repo().find_top_rated(SUGGESTED_LIMIT).await?,
        ))
    }

    /// Random selection; `limit` defaults to 10 and is clamped to 1..=50
    #[instrument(skip(self))]
    pub async fn random(
        &self,
        limit: Option<i64>,
        exclude_id: Option<Snowflake>,
    ) -> ServiceResult<Vec<RecipeResponse>> {
        let limit = limit.unwrap_or(RANDOM_DEFAULT_LIMIT).clamp(1, RANDOM_MAX_LIMIT);
        Ok(into_responses(
            self.ctx.recipe_repo().find_random(limit, exclude_id).await?,
        ))
    }

    /// Set a recipe's rating (owner or ADMIN)
    #[instrument(skip(self))]
    pub async fn update_rating(
        &self,
        recipe_id: Snowflake,
        actor_id: Snowflake,
        rating: f64,
    ) -> ServiceResult<RecipeResponse> {
        if !(0.0..=5.0).contains(&rating) {
            return Err(ServiceError::validation("Rating must be between 0 and 5"));
        }

        let access = AccessService::new(self.ctx);
        let actor = access.require_actor(actor_id).await?;
        let recipe = self.find_recipe(recipe_id).await?;
        access.ensure_recipe_manager(&actor, &recipe)?;

        self.ctx.recipe_repo().update_rating(recipe_id, rating).await?;

        info!(recipe_id = %recipe_id, rating, "Recipe rated");
        Ok(self.find_recipe(recipe_id).await?.into())
    }

    pub(crate) async fn find_recipe(&self, recipe_id: Snowflake) -> ServiceResult<Recipe> {
        self.ctx
            .recipe_repo()
            .find_by_id(recipe_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Recipe", recipe_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::Fixture;

    fn request(title: &str) -> CreateRecipeRequest {
        CreateRecipeRequest {
            title: title.to_string(),
            description: Some("  ".into()),
            time_in_mins: 40,
            prep_time: Some(10),
            cook_time: Some(30),
            servings: 2,
            cuisine: Some("Italian".into()),
            meal_type: None,
            diet: None,
            main_ingredient: Some("Tomato".into()),
            ingredients: vec!["tomato".into(), " ".into(), "basil ".into()],
            instructions: vec!["chop".into(), "simmer".into()],
        }
    }

    #[tokio::test]
    async fn test_create_recipe_defaults() {
        let fx = Fixture::new();
        let owner = fx.user("owner").await;
        let service = RecipeService::new(&fx.ctx);

        let recipe = service.create_recipe(owner.id, request("Sauce")).await.unwrap();
        assert_eq!(recipe.owner_id, owner.id.to_string());
        assert!(!recipe.active);
        assert!(recipe.rating.abs() < f64::EPSILON);
        assert_eq!(recipe.description, None);
        assert_eq!(recipe.ingredients, vec!["tomato".to_string(), "basil".to_string()]);
    }

    #[tokio::test]
    async fn test_only_owner_updates() {
        let fx = Fixture::new();
        let owner = fx.user("owner").await;
        let other = fx.user("other").await;
        let recipe = fx.recipe(&owner, "Soup").await;
        let service = RecipeService::new(&fx.ctx);

        let update = UpdateRecipeRequest {
            title: Some("Better Soup".into()),
            servings: Some(6),
            ..Default::default()
        };
        let err = service.update_recipe(recipe.id, other.id, update.clone()).await.unwrap_err();
        assert_eq!(err.status_code(), 403);

        let updated = service.update_recipe(recipe.id, owner.id, update).await.unwrap();
        assert_eq!(updated.title, "Better Soup");
        assert_eq!(updated.servings, 6);
        assert_eq!(updated.time_in_mins, recipe.time_in_mins);
    }

    #[tokio::test]
    async fn test_admin_can_delete_and_rate() {
        let fx = Fixture::new();
        let owner = fx.user("owner").await;
        let other = fx.user("other").await;
        let admin = fx.admin("admin").await;
        let recipe = fx.recipe(&owner, "Soup").await;
        let service = RecipeService::new(&fx.ctx);

        assert_eq!(
            service.update_rating(recipe.id, other.id, 4.0).await.unwrap_err().status_code(),
            403
        );
        let rated = service.update_rating(recipe.id, admin.id, 4.5).await.unwrap();
        assert!((rated.rating - 4.5).abs() < f64::EPSILON);
        assert!(service.update_rating(recipe.id, owner.id, 7.0).await.is_err());

        assert_eq!(
            service.delete_recipe(recipe.id, other.id).await.unwrap_err().status_code(),
            403
        );
        service.delete_recipe(recipe.id, admin.id).await.unwrap();
        assert!(service.get_recipe(recipe.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_search_and_suggested() {
        let fx = Fixture::new();
        let owner = fx.user("owner").await;
        let service = RecipeService::new(&fx.ctx);

        let sauce = service.create_recipe(owner.id, request("Tomato Sauce")).await.unwrap();
        let mut quick = request("Quick Salad");
        quick.cuisine = Some("Greek".into());
        quick.time_in_mins = 10;
        service.create_recipe(owner.id, quick).await.unwrap();

        let found = service
            .search(RecipeFilterRequest {
                cuisine: Some("italian".into()),
                max_cooking_time: Some(45),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, sauce.id);

        let everything = service.search(RecipeFilterRequest::default()).await.unwrap();
        assert_eq!(everything.len(), 2);

        for i in 0..8 {
            fx.recipe(&owner, &format!("Filler {i}")).await;
        }
        let sauce_id: Snowflake = sauce.id.parse().unwrap();
        service.update_rating(sauce_id, owner.id, 5.0).await.unwrap();
        let suggested = service.suggested().await.unwrap();
        assert_eq!(suggested.len(), 6);
        assert_eq!(suggested[0].id, sauce.id);
    }

    #[tokio::test]
    async fn test_random_clamps_and_excludes() {
        let fx = Fixture::new();
        let owner = fx.user("owner").await;
        let keep = fx.recipe(&owner, "Keep").await;
        let skip = fx.recipe(&owner, "Skip").await;
        let service = RecipeService::new(&fx.ctx);

        let picked = service.random(Some(0), None).await.unwrap();
        assert_eq!(picked.len(), 1);

        let picked = service.random(Some(500), Some(skip.id)).await.unwrap();
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].id, keep.id.to_string());
    }
}
