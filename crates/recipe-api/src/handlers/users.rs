//! User handlers
//!
//! The caller's own profile and saved recipes, plus public profiles.

use axum::{
    extract::{Path, State},
    Json,
};
use recipe_service::{
    ChangePasswordRequest, ProfileResponse, PublicUserResponse, RecipeResponse, SavedStatusResponse,
    UpdateProfileRequest, UserService,
};

use crate::extractors::{AuthUser, RecipeIdPath, UsernamePath, ValidatedJson};
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// GET /users/profile
pub async fn get_profile(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<ProfileResponse>> {
    let service = UserService::new(state.service_context());
    Ok(Json(service.get_profile(auth.user_id).await?))
}

/// Update username, email or bio
///
/// PUT /users/profile
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<Json<ProfileResponse>> {
    let service = UserService::new(state.service_context());
    Ok(Json(service.update_profile(auth.user_id, request).await?))
}

/// POST /users/change-password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult<NoContent> {
    let service = UserService::new(state.service_context());
    service.change_password(auth.user_id, request).await?;
    Ok(NoContent)
}

/// Delete the caller's account
///
/// DELETE /users/delete-account
pub async fn delete_account(State(state): State<AppState>, auth: AuthUser) -> ApiResult<NoContent> {
    let service = UserService::new(state.service_context());
    service.delete_account(auth.user_id).await?;
    Ok(NoContent)
}

/// GET /users/{username}
pub async fn get_public_profile(
    State(state): State<AppState>,
    Path(path): Path<UsernamePath>,
) -> ApiResult<Json<PublicUserResponse>> {
    let service = UserService::new(state.service_context());
    Ok(Json(service.get_public_profile(&path.username).await?))
}

/// GET /users/{username}/recipes
pub async fn recipes_by_username(
    State(state): State<AppState>,
    Path(path): Path<UsernamePath>,
) -> ApiResult<Json<Vec<RecipeResponse>>> {
    let service = UserService::new(state.service_context());
    Ok(Json(service.recipes_by_username(&path.username).await?))
}

/// GET /users/my-recipes
pub async fn my_recipes(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<Vec<RecipeResponse>>> {
    let service = UserService::new(state.service_context());
    Ok(Json(service.my_recipes(auth.user_id).await?))
}

/// GET /users/saved-recipes
pub async fn saved_recipes(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<RecipeResponse>>> {
    let service = UserService::new(state.service_context());
    Ok(Json(service.saved_recipes(auth.user_id).await?))
}

/// GET /users/recipe/{recipe_id}/saved
pub async fn is_recipe_saved(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<RecipeIdPath>,
) -> ApiResult<Json<SavedStatusResponse>> {
    let recipe_id = path.recipe_id()?;
    let service = UserService::new(state.service_context());
    Ok(Json(service.is_recipe_saved(auth.user_id, recipe_id).await?))
}

/// POST /users/save-recipe/{recipe_id}
pub async fn save_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<RecipeIdPath>,
) -> ApiResult<NoContent> {
    let recipe_id = path.recipe_id()?;
    let service = UserService::new(state.service_context());
    service.save_recipe(auth.user_id, recipe_id).await?;
    Ok(NoContent)
}

/// DELETE /users/unsave-recipe/{recipe_id}
pub async fn unsave_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<RecipeIdPath>,
) -> ApiResult<NoContent> {
    let recipe_id = path.recipe_id()?;
    let service = UserService::new(state.service_context());
    service.unsave_recipe(auth.user_id, recipe_id).await?;
    Ok(NoContent)
}
