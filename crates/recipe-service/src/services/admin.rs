//! Administration service
//!
//! User, recipe and comment moderation. Every operation re-checks that the
//! caller holds the ADMIN role.

use std::collections::HashMap;

use recipe_core::entities::User;
use recipe_core::Snowflake;
use tracing::{info, instrument, warn};

use crate::dto::{AdminCommentResponse, ProfileResponse, RecipeResponse, RecipeStatsResponse};

use super::access::AccessService;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Administration service
pub struct AdminService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AdminService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// All accounts except the caller's
    #[instrument(skip(self))]
    pub async fn list_users(&self, admin_id: Snowflake) -> ServiceResult<Vec<ProfileResponse>> {
        self.access().require_admin(admin_id).await?;

        let users = self.ctx.user_repo().find_all().await?;
        Ok(users
            .iter()
            .filter(|u| u.id != admin_id)
            .map(ProfileResponse::from)
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, admin_id: Snowflake, user_id: Snowflake) -> ServiceResult<()> {
        self.access().require_admin(admin_id).await?;
        refuse_self(admin_id, user_id, "delete")?;
        self.find_user(user_id).await?;

        self.ctx.user_repo().delete(user_id).await?;

        info!(admin_id = %admin_id, user_id = %user_id, "User deleted by admin");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn activate_user(&self, admin_id: Snowflake, user_id: Snowflake) -> ServiceResult<ProfileResponse> {
        self.set_user_active(admin_id, user_id, true).await
    }

    #[instrument(skip(self))]
    pub async fn deactivate_user(&self, admin_id: Snowflake, user_id: Snowflake) -> ServiceResult<ProfileResponse> {
        refuse_self(admin_id, user_id, "deactivate")?;
        self.set_user_active(admin_id, user_id, false).await
    }

    async fn set_user_active(
        &self,
        admin_id: Snowflake,
        user_id: Snowflake,
        active: bool,
    ) -> ServiceResult<ProfileResponse> {
        self.access().require_admin(admin_id).await?;

        let mut user = self.find_user(user_id).await?;
        user.set_active(active);
        self.ctx.user_repo().update(&user).await?;

        info!(admin_id = %admin_id, user_id = %user_id, active, "User status changed");
        Ok(ProfileResponse::from(user))
    }

    // ========================================================================
    // Recipes
    // ========================================================================

    /// Every recipe, published or not
    #[instrument(skip(self))]
    pub async fn list_recipes(&self, admin_id: Snowflake) -> ServiceResult<Vec<RecipeResponse>> {
        self.access().require_admin(admin_id).await?;
        let recipes = self.ctx.recipe_repo().find_all().await?;
        Ok(recipes.into_iter().map(RecipeResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn delete_recipe(&self, admin_id: Snowflake, recipe_id: Snowflake) -> ServiceResult<()> {
        self.access().require_admin(admin_id).await?;
        self.ensure_recipe(recipe_id).await?;

        self.ctx.recipe_repo().delete(recipe_id).await?;

        info!(admin_id = %admin_id, recipe_id = %recipe_id, "Recipe deleted by admin");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn recipe_stats(&self, admin_id: Snowflake) -> ServiceResult<RecipeStatsResponse> {
        self.access().require_admin(admin_id).await?;
        Ok(self.ctx.recipe_repo().stats().await?.into())
    }

    /// Publish or unpublish a recipe
    #[instrument(skip(self))]
    pub async fn set_recipe_status(
        &self,
        admin_id: Snowflake,
        recipe_id: Snowflake,
        active: bool,
    ) -> ServiceResult<RecipeResponse> {
        self.access().require_admin(admin_id).await?;
        self.ensure_recipe(recipe_id).await?;

        self.ctx.recipe_repo().set_active(recipe_id, active).await?;

        info!(recipe_id = %recipe_id, active, "Recipe status changed");
        let recipe = self
            .ctx
            .recipe_repo()
            .find_by_id(recipe_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Recipe", recipe_id.to_string()))?;
        Ok(recipe.into())
    }

    // ========================================================================
    // Comments
    // ========================================================================

    /// Every comment, newest first, with author and recipe names resolved
    #[instrument(skip(self))]
    pub async fn list_comments(&self, admin_id: Snowflake) -> ServiceResult<Vec<AdminCommentResponse>> {
        self.access().require_admin(admin_id).await?;

        let comments = self.ctx.comment_repo().find_all().await?;

        let mut author_ids: Vec<Snowflake> = comments.iter().map(|c| c.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();
        let mut recipe_ids: Vec<Snowflake> = comments.iter().map(|c| c.recipe_id).collect();
        recipe_ids.sort_unstable();
        recipe_ids.dedup();

        let usernames: HashMap<Snowflake, String> = self
            .ctx
            .user_repo()
            .find_by_ids(&author_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();
        let titles: HashMap<Snowflake, String> = self
            .ctx
            .recipe_repo()
            .find_by_ids(&recipe_ids)
            .await?
            .into_iter()
            .map(|r| (r.id, r.title))
            .collect();

        Ok(comments
            .iter()
            .map(|c| {
                AdminCommentResponse::new(
                    c,
                    usernames.get(&c.author_id).map_or("", String::as_str),
                    titles.get(&c.recipe_id).map_or("", String::as_str),
                )
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn clear_report(&self, admin_id: Snowflake, comment_id: Snowflake) -> ServiceResult<()> {
        self.access().require_admin(admin_id).await?;
        self.ensure_comment(comment_id).await?;

        self.ctx.comment_repo().set_reported(comment_id, false).await?;

        info!(comment_id = %comment_id, "Comment report cleared");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_comment(&self, admin_id: Snowflake, comment_id: Snowflake) -> ServiceResult<()> {
        self.access().require_admin(admin_id).await?;
        self.ensure_comment(comment_id).await?;

        self.ctx.comment_repo().delete(comment_id).await?;

        info!(admin_id = %admin_id, comment_id = %comment_id, "Comment deleted by admin");
        Ok(())
    }

    fn access(&self) -> AccessService<'a> {
        AccessService::new(self.ctx)
    }

    async fn find_user(&self, user_id: Snowflake) -> ServiceResult<User> {
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id.to_string()))
    }

    async fn ensure_recipe(&self, recipe_id: Snowflake) -> ServiceResult<()> {
        match self.ctx.recipe_repo().find_by_id(recipe_id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::not_found("Recipe", recipe_id.to_string())),
        }
    }

    async fn ensure_comment(&self, comment_id: Snowflake) -> ServiceResult<()> {
        match self.ctx.comment_repo().find_by_id(comment_id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::not_found("Comment", comment_id.to_string())),
        }
    }
}

fn refuse_self(admin_id: Snowflake, user_id: Snowflake, action: &str) -> ServiceResult<()> {
    if admin_id == user_id {
        warn!(admin_id = %admin_id, action, "Admin targeted their own account");
        return Err(ServiceError::validation(format!("Administrators cannot {action} their own account")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use recipe_core::traits::CommentRepository;

    use super::*;
    use crate::services::comment::CommentService;
    use crate::services::test_support::Fixture;

    #[tokio::test]
    async fn test_non_admin_is_refused() {
        let fx = Fixture::new();
        let user = fx.user("cook").await;
        let service = AdminService::new(&fx.ctx);

        let err = service.list_users(user.id).await.unwrap_err();
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.error_code(), "ADMIN_REQUIRED");
        assert_eq!(service.recipe_stats(user.id).await.unwrap_err().status_code(), 403);
    }

    #[tokio::test]
    async fn test_user_management() {
        let fx = Fixture::new();
        let admin = fx.admin("admin").await;
        let cook = fx.user("cook").await;
        let service = AdminService::new(&fx.ctx);

        let users = service.list_users(admin.id).await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, cook.id.to_string());

        let profile = service.deactivate_user(admin.id, cook.id).await.unwrap();
        assert!(!profile.active);
        let profile = service.activate_user(admin.id, cook.id).await.unwrap();
        assert!(profile.active);

        assert_eq!(service.deactivate_user(admin.id, admin.id).await.unwrap_err().status_code(), 400);
        assert_eq!(service.delete_user(admin.id, admin.id).await.unwrap_err().status_code(), 400);

        service.delete_user(admin.id, cook.id).await.unwrap();
        assert!(service.delete_user(admin.id, cook.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_deactivated_admin_loses_rights() {
        let fx = Fixture::new();
        let first = fx.admin("first").await;
        let second = fx.admin("second").await;
        let service = AdminService::new(&fx.ctx);

        service.deactivate_user(first.id, second.id).await.unwrap();
        let err = service.list_users(second.id).await.unwrap_err();
        assert_eq!(err.error_code(), "ACCOUNT_DEACTIVATED");
    }

    #[tokio::test]
    async fn test_recipe_moderation() {
        let fx = Fixture::new();
        let admin = fx.admin("admin").await;
        let cook = fx.user("cook").await;
        let pending = fx.recipe(&cook, "Pending").await;
        let other = fx.recipe(&cook, "Other").await;
        let service = AdminService::new(&fx.ctx);

        let published = service.set_recipe_status(admin.id, pending.id, true).await.unwrap();
        assert!(published.active);

        let stats = service.recipe_stats(admin.id).await.unwrap();
        assert_eq!((stats.total, stats.published, stats.pending), (2, 1, 1));

        service.delete_recipe(admin.id, other.id).await.unwrap();
        assert_eq!(service.list_recipes(admin.id).await.unwrap().len(), 1);
        assert!(service
            .set_recipe_status(admin.id, other.id, true)
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn test_comment_moderation() {
        let fx = Fixture::new();
        let admin = fx.admin("admin").await;
        let cook = fx.user("cook").await;
        let recipe = fx.recipe(&cook, "Gumbo").await;
        let older = fx.comment(&recipe, &cook, "First!").await;
        let newer = fx.comment(&recipe, &cook, "Second").await;
        let service = AdminService::new(&fx.ctx);

        CommentService::new(&fx.ctx).report_comment(older.id, cook.id).await.unwrap();

        let rows = service.list_comments(admin.id).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, newer.id.to_string());
        assert_eq!(rows[1].username, "cook");
        assert_eq!(rows[1].recipe_title, "Gumbo");
        assert!(rows[1].reported);

        service.clear_report(admin.id, older.id).await.unwrap();
        assert!(!fx.stored_comment(&older).await.reported);

        service.delete_comment(admin.id, newer.id).await.unwrap();
        assert!(CommentRepository::find_by_id(&fx.store, newer.id).await.unwrap().is_none());
    }
}
