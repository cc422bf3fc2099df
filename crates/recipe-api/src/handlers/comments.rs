//! Comment handlers
//!
//! Listing, writing and moderation flags, plus the like/dislike toggles.

use axum::{
    extract::{Path, State},
    Json,
};
use recipe_service::{CommentService, CommentTextRequest, CommentView, ReactionService};

use crate::extractors::{AuthUser, CommentIdPath, OptionalAuthUser, RecipeIdPath, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Comments on a recipe, oldest first; reaction flags are filled in for
/// the caller when a token is sent
///
/// GET /comments/recipe/{recipe_id}
pub async fn list_comments(
    State(state): State<AppState>,
    viewer: OptionalAuthUser,
    Path(path): Path<RecipeIdPath>,
) -> ApiResult<Json<Vec<CommentView>>> {
    let recipe_id = path.recipe_id()?;
    let service = CommentService::new(state.service_context());
    Ok(Json(service.list_comments(recipe_id, viewer.user_id()).await?))
}

/// POST /comments/recipe/{recipe_id}
pub async fn add_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<RecipeIdPath>,
    ValidatedJson(request): ValidatedJson<CommentTextRequest>,
) -> ApiResult<Created<Json<CommentView>>> {
    let recipe_id = path.recipe_id()?;
    let service = CommentService::new(state.service_context());
    let view = service.add_comment(recipe_id, auth.user_id, request).await?;
    Ok(Created(Json(view)))
}

/// Edit a comment (author or admin)
///
/// PUT /comments/{comment_id}
pub async fn update_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<CommentIdPath>,
    ValidatedJson(request): ValidatedJson<CommentTextRequest>,
) -> ApiResult<Json<CommentView>> {
    let comment_id = path.comment_id()?;
    let service = CommentService::new(state.service_context());
    Ok(Json(service.update_comment(comment_id, auth.user_id, request).await?))
}

/// Delete a comment (author, recipe owner or admin)
///
/// DELETE /comments/{comment_id}
pub async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<CommentIdPath>,
) -> ApiResult<NoContent> {
    let comment_id = path.comment_id()?;
    let service = CommentService::new(state.service_context());
    service.delete_comment(comment_id, auth.user_id).await?;
    Ok(NoContent)
}

/// Like, or take back an existing like
///
/// POST /comments/{comment_id}/like
pub async fn like_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<CommentIdPath>,
) -> ApiResult<Json<CommentView>> {
    let comment_id = path.comment_id()?;
    let service = ReactionService::new(state.service_context());
    Ok(Json(service.react_like(comment_id, auth.user_id).await?))
}

/// Dislike, or take back an existing dislike
///
/// POST /comments/{comment_id}/dislike
pub async fn dislike_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<CommentIdPath>,
) -> ApiResult<Json<CommentView>> {
    let comment_id = path.comment_id()?;
    let service = ReactionService::new(state.service_context());
    Ok(Json(service.react_dislike(comment_id, auth.user_id).await?))
}

/// POST /comments/{comment_id}/report
pub async fn report_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<CommentIdPath>,
) -> ApiResult<NoContent> {
    let comment_id = path.comment_id()?;
    let service = CommentService::new(state.service_context());
    service.report_comment(comment_id, auth.user_id).await?;
    Ok(NoContent)
}
