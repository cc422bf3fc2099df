//! Access control
//!
//! Roles are read from the store on every check, so a demoted or
//! deactivated account loses its rights even while its token is valid.

use recipe_core::entities::{Comment, Recipe, User};
use recipe_core::{DomainError, Snowflake};
use tracing::{debug, instrument, warn};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Access control checks shared by the services
pub struct AccessService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AccessService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Load the acting user; deactivated accounts are refused
    #[instrument(skip(self))]
    pub async fn require_actor(&self, user_id: Snowflake) -> ServiceResult<User> {
        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id.to_string()))?;

        if !user.active {
            warn!(user_id = %user_id, "Deactivated account attempted an action");
            return Err(DomainError::AccountDeactivated.into());
        }
        Ok(user)
    }

    /// Load the acting user and require the ADMIN role
    #[instrument(skip(self))]
    pub async fn require_admin(&self, user_id: Snowflake) -> ServiceResult<User> {
        let user = self.require_actor(user_id).await?;
        if !user.is_admin() {
            debug!(user_id = %user_id, "Admin role required");
            return Err(DomainError::AdminRequired.into());
        }
        Ok(user)
    }

    /// Owner only
    pub fn ensure_recipe_owner(&self, actor: &User, recipe: &Recipe) -> ServiceResult<()> {
        if recipe.is_owner(actor.id) {
            Ok(())
        } else {
            Err(DomainError::NotRecipeOwner.into())
        }
    }

    /// Owner or ADMIN
    pub fn ensure_recipe_manager(&self, actor: &User, recipe: &Recipe) -> ServiceResult<()> {
        if actor.is_admin() {
            return Ok(());
        }
        self.ensure_recipe_owner(actor, recipe)
    }

    /// Author or ADMIN
    pub fn ensure_comment_editor(&self, actor: &User, comment: &Comment) -> ServiceResult<()> {
        if comment.is_author(actor.id) || actor.is_admin() {
            Ok(())
        } else {
            Err(DomainError::NotCommentAuthor.into())
        }
    }

    /// Author, owner of the recipe the comment is on, or ADMIN
    pub async fn ensure_comment_remover(&self, actor: &User, comment: &Comment) -> ServiceResult<()> {
        if comment.is_author(actor.id) || actor.is_admin() {
            return Ok(());
        }

        let recipe_owner = self
            .ctx
            .recipe_repo()
            .find_by_id(comment.recipe_id)
            .await?
            .map(|r| r.owner_id);
        if recipe_owner == Some(actor.id) {
            Ok(())
        } else {
            Err(ServiceError::permission_denied(
                "only the author, the recipe owner or an administrator can delete this comment",
            ))
        }
    }
}
