//! Administration handlers
//!
//! The ADMIN role is enforced by [`AdminService`] against the stored
//! account, not by the token's role claim.

use axum::{
    extract::{Path, State},
    Json,
};
use recipe_service::{
    AdminCommentResponse, AdminService, ProfileResponse, RecipeResponse, RecipeStatsResponse,
    RecipeStatusRequest,
};

use crate::extractors::{AuthUser, CommentIdPath, RecipeIdPath, UserIdPath};
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// GET /admin/users
pub async fn list_users(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<Vec<ProfileResponse>>> {
    let service = AdminService::new(state.service_context());
    Ok(Json(service.list_users(auth.user_id).await?))
}

/// DELETE /admin/users/{user_id}
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<UserIdPath>,
) -> ApiResult<NoContent> {
    let user_id = path.user_id()?;
    let service = AdminService::new(state.service_context());
    service.delete_user(auth.user_id, user_id).await?;
    Ok(NoContent)
}

/// PUT /admin/users/{user_id}/activate
pub async fn activate_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<UserIdPath>,
) -> ApiResult<Json<ProfileResponse>> {
    let user_id = path.user_id()?;
    let service = AdminService::new(state.service_context());
    Ok(Json(service.activate_user(auth.user_id, user_id).await?))
}

/// PUT /admin/users/{user_id}/deactivate
pub async fn deactivate_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<UserIdPath>,
) -> ApiResult<Json<ProfileResponse>> {
    let user_id = path.user_id()?;
    let service = AdminService::new(state.service_context());
    Ok(Json(service.deactivate_user(auth.user_id, user_id).await?))
}

/// GET /admin/recipes
pub async fn list_recipes(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<Vec<RecipeResponse>>> {
    let service = AdminService::new(state.service_context());
    Ok(Json(service.list_recipes(auth.user_id).await?))
}

/// DELETE /admin/recipes/{recipe_id}
pub async fn delete_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<RecipeIdPath>,
) -> ApiResult<NoContent> {
    let recipe_id = path.recipe_id()?;
    let service = AdminService::new(state.service_context());
    service.delete_recipe(auth.user_id, recipe_id).await?;
    Ok(NoContent)
}

/// GET /admin/recipes/stats
pub async fn recipe_stats(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<RecipeStatsResponse>> {
    let service = AdminService::new(state.service_context());
    Ok(Json(service.recipe_stats(auth.user_id).await?))
}

/// Publish or unpublish
///
/// PUT /admin/recipes/{recipe_id}/status
pub async fn set_recipe_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<RecipeIdPath>,
    Json(request): Json<RecipeStatusRequest>,
) -> ApiResult<Json<RecipeResponse>> {
    let recipe_id = path.recipe_id()?;
    let service = AdminService::new(state.service_context());
    Ok(Json(
        service.set_recipe_status(auth.user_id, recipe_id, request.active).await?,
    ))
}

/// Every comment, newest first
///
/// GET /admin/comments
pub async fn list_comments(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<AdminCommentResponse>>> {
    let service = AdminService::new(state.service_context());
    Ok(Json(service.list_comments(auth.user_id).await?))
}

/// PUT /admin/comments/{comment_id}/clear-report
pub async fn clear_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<CommentIdPath>,
) -> ApiResult<NoContent> {
    let comment_id = path.comment_id()?;
    let service = AdminService::new(state.service_context());
    service.clear_report(auth.user_id, comment_id).await?;
    Ok(NoContent)
}

/// DELETE /admin/comments/{comment_id}
pub async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<CommentIdPath>,
) -> ApiResult<NoContent> {
    let comment_id = path.comment_id()?;
    let service = AdminService::new(state.service_context());
    service.delete_comment(auth.user_id, comment_id).await?;
    Ok(NoContent)
}
