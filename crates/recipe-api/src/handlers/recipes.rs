//! Recipe handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use recipe_service::{
    CreateRecipeRequest, RecipeFilterRequest, RecipeResponse, RecipeService, UpdateRatingRequest,
    UpdateRecipeRequest,
};
use serde::Deserialize;

use crate::extractors::{AuthUser, RecipeIdPath, ValidatedJson, ValidatedQuery};
use crate::response::{ApiError, ApiResult, Created, NoContent};
use crate::state::AppState;

/// Query for GET /recipes/random
#[derive(Debug, Deserialize)]
pub struct RandomQuery {
    pub limit: Option<i64>,
    pub exclude_id: Option<String>,
}

/// GET /recipes
pub async fn list_recipes(State(state): State<AppState>) -> ApiResult<Json<Vec<RecipeResponse>>> {
    let service = RecipeService::new(state.service_context());
    Ok(Json(service.list_recipes().await?))
}

/// GET /recipes/{recipe_id}
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(path): Path<RecipeIdPath>,
) -> ApiResult<Json<RecipeResponse>> {
    let recipe_id = path.recipe_id()?;
    let service = RecipeService::new(state.service_context());
    Ok(Json(service.get_recipe(recipe_id).await?))
}

/// Create a recipe owned by the caller
///
/// POST /recipes
pub async fn create_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateRecipeRequest>,
) -> ApiResult<Created<Json<RecipeResponse>>> {
    let service = RecipeService::new(state.service_context());
    let recipe = service.create_recipe(auth.user_id, request).await?;
    Ok(Created(Json(recipe)))
}

/// Update a recipe (owner only)
///
/// PUT /recipes/{recipe_id}
pub async fn update_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<RecipeIdPath>,
    ValidatedJson(request): ValidatedJson<UpdateRecipeRequest>,
) -> ApiResult<Json<RecipeResponse>> {
    let recipe_id = path.recipe_id()?;
    let service = RecipeService::new(state.service_context());
    Ok(Json(service.update_recipe(recipe_id, auth.user_id, request).await?))
}

/// Delete a recipe (owner or admin)
///
/// DELETE /recipes/{recipe_id}
pub async fn delete_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<RecipeIdPath>,
) -> ApiResult<NoContent> {
    let recipe_id = path.recipe_id()?;
    let service = RecipeService::new(state.service_context());
    service.delete_recipe(recipe_id, auth.user_id).await?;
    Ok(NoContent)
}

/// GET /recipes/search?title=&cuisine=&...
pub async fn search_recipes(
    State(state): State<AppState>,
    ValidatedQuery(filter): ValidatedQuery<RecipeFilterRequest>,
) -> ApiResult<Json<Vec<RecipeResponse>>> {
    let service = RecipeService::new(state.service_context());
    Ok(Json(service.search(filter).await?))
}

/// Same criteria as search, sent as a JSON body
///
/// POST /recipes/filter
pub async fn filter_recipes(
    State(state): State<AppState>,
    ValidatedJson(filter): ValidatedJson<RecipeFilterRequest>,
) -> ApiResult<Json<Vec<RecipeResponse>>> {
    let service = RecipeService::new(state.service_context());
    Ok(Json(service.search(filter).await?))
}

/// GET /recipes/suggested
pub async fn suggested_recipes(State(state): State<AppState>) -> ApiResult<Json<Vec<RecipeResponse>>> {
    let service = RecipeService::new(state.service_context());
    Ok(Json(service.suggested().await?))
}

/// GET /recipes/random?limit=10&exclude_id=
pub async fn random_recipes(
    State(state): State<AppState>,
    Query(query): Query<RandomQuery>,
) -> ApiResult<Json<Vec<RecipeResponse>>> {
    let exclude_id = query
        .exclude_id
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse()
                .map_err(|_| ApiError::invalid_query("Invalid exclude_id format"))
        })
        .transpose()?;

    let service = RecipeService::new(state.service_context());
    Ok(Json(service.random(query.limit, exclude_id).await?))
}

/// Set the rating (owner or admin)
///
/// PUT /recipes/{recipe_id}/rating
pub async fn update_rating(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<RecipeIdPath>,
    ValidatedJson(request): ValidatedJson<UpdateRatingRequest>,
) -> ApiResult<Json<RecipeResponse>> {
    let recipe_id = path.recipe_id()?;
    let service = RecipeService::new(state.service_context());
    Ok(Json(
        service.update_rating(recipe_id, auth.user_id, request.rating).await?,
    ))
}
