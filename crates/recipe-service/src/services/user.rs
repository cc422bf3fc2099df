//! User service
//!
//! Profile management and the saved-recipes list.

use recipe_common::auth::{hash_password, validate_password_strength, verify_password};
use recipe_common::AppError;
use recipe_core::entities::User;
use recipe_core::{DomainError, Snowflake};
use tracing::{info, instrument};

use crate::dto::{
    ChangePasswordRequest, ProfileResponse, PublicUserResponse, RecipeResponse, SavedStatusResponse,
    UpdateProfileRequest,
};

use super::access::AccessService;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self))]
    pub async fn get_profile(&self, user_id: Snowflake) -> ServiceResult<ProfileResponse> {
        let user = self.find_user(user_id).await?;
        Ok(ProfileResponse::from(user))
    }

    /// Update username, email and bio; only changed values are checked for conflicts
    #[instrument(skip(self, request))]
    pub async fn update_profile(
        &self,
        user_id: Snowflake,
        request: UpdateProfileRequest,
    ) -> ServiceResult<ProfileResponse> {
        let mut user = AccessService::new(self.ctx).require_actor(user_id).await?;

        if let Some(username) = request.username.map(|u| u.trim().to_string()) {
            if username != user.username {
                if User::is_reserved_username(&username) {
                    return Err(ServiceError::validation(format!("Username '{username}' is reserved")));
                }
                if self.ctx.user_repo().username_exists(&username).await? {
                    return Err(DomainError::UsernameAlreadyExists.into());
                }
                user.set_username(username);
            }
        }

        if let Some(email) = request.email.map(|e| e.trim().to_lowercase()) {
            if email != user.email {
                if self.ctx.user_repo().email_exists(&email).await? {
                    return Err(DomainError::EmailAlreadyExists.into());
                }
                user.set_email(email);
            }
        }

        if let Some(bio) = request.bio {
            user.set_bio(Some(bio));
        }

        self.ctx.user_repo().update(&user).await?;

        info!(user_id = %user_id, "Profile updated");
        Ok(ProfileResponse::from(user))
    }

    #[instrument(skip(self, request))]
    pub async fn change_password(
        &self,
        user_id: Snowflake,
        request: ChangePasswordRequest,
    ) -> ServiceResult<()> {
        AccessService::new(self.ctx).require_actor(user_id).await?;

        let current_hash = self
            .ctx
            .user_repo()
            .get_password_hash(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id.to_string()))?;

        if !verify_password(&request.current_password, &current_hash)? {
            return Err(ServiceError::App(AppError::InvalidCredentials));
        }
        if request.current_password == request.new_password {
            return Err(ServiceError::validation(
                "New password must differ from the current password",
            ));
        }
        validate_password_strength(&request.new_password)?;

        let new_hash = hash_password(&request.new_password)?;
        self.ctx.user_repo().update_password(user_id, &new_hash).await?;

        info!(user_id = %user_id, "Password changed");
        Ok(())
    }

    /// Delete the caller's account with everything it owns
    #[instrument(skip(self))]
    pub async fn delete_account(&self, user_id: Snowflake) -> ServiceResult<()> {
        self.find_user(user_id).await?;
        self.ctx.user_repo().delete(user_id).await?;

        info!(user_id = %user_id, "Account deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get_public_profile(&self, username: &str) -> ServiceResult<PublicUserResponse> {
        let user = self.find_by_username(username).await?;
        Ok(PublicUserResponse::from(&user))
    }

    #[instrument(skip(self))]
    pub async fn recipes_by_username(&self, username: &str) -> ServiceResult<Vec<RecipeResponse>> {
        let user = self.find_by_username(username).await?;
        let recipes = self.ctx.recipe_repo().find_by_owner(user.id).await?;
        Ok(recipes.into_iter().map(RecipeResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn my_recipes(&self, user_id: Snowflake) -> ServiceResult<Vec<RecipeResponse>> {
        self.find_user(user_id).await?;
        let recipes = self.ctx.recipe_repo().find_by_owner(user_id).await?;
        Ok(recipes.into_iter().map(RecipeResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn saved_recipes(&self, user_id: Snowflake) -> ServiceResult<Vec<RecipeResponse>> {
        self.find_user(user_id).await?;
        let recipes = self.ctx.recipe_repo().find_saved_by_user(user_id).await?;
        Ok(recipes.into_iter().map(RecipeResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn is_recipe_saved(
        &self,
        user_id: Snowflake,
        recipe_id: Snowflake,
    ) -> ServiceResult<SavedStatusResponse> {
        let saved = self.ctx.recipe_repo().is_saved_by_user(user_id, recipe_id).await?;
        Ok(SavedStatusResponse { saved })
    }

    /// Idempotent
    #[instrument(skip(self))]
    pub async fn save_recipe(&self, user_id: Snowflake, recipe_id: Snowflake) -> ServiceResult<()> {
        AccessService::new(self.ctx).require_actor(user_id).await?;
        if self.ctx.recipe_repo().find_by_id(recipe_id).await?.is_none() {
            return Err(ServiceError::not_found("Recipe", recipe_id.to_string()));
        }

        self.ctx.recipe_repo().save_for_user(user_id, recipe_id).await?;

        info!(user_id = %user_id, recipe_id = %recipe_id, "Recipe saved");
        Ok(())
    }

    /// Idempotent; unsaving a recipe that was never saved is not an error
    #[instrument(skip(self))]
    pub async fn unsave_recipe(&self, user_id: Snowflake, recipe_id: Snowflake) -> ServiceResult<()> {
        self.ctx.recipe_repo().unsave_for_user(user_id, recipe_id).await?;
        info!(user_id = %user_id, recipe_id = %recipe_id, "Recipe unsaved");
        Ok(())
    }

    async fn find_user(&self, user_id: Snowflake) -> ServiceResult<User> {
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id.to_string()))
    }

    async fn find_by_username(&self, username: &str) -> ServiceResult<User> {
        self.ctx
            .user_repo()
            .find_by_username(username)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", username))
    }
}
