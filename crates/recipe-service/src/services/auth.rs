//! Authentication service
//!
//! Handles signup, login and token refresh. Tokens are stateless; a refresh
//! re-reads the account so a deactivated user cannot mint new tokens.

use recipe_common::auth::{hash_password, validate_password_strength, verify_password};
use recipe_common::{AppError, TokenPair};
use recipe_core::entities::User;
use recipe_core::DomainError;
use tracing::{info, instrument, warn};

use crate::dto::{AuthResponse, LoginRequest, ProfileResponse, RefreshTokenRequest, SignupRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new account with the `User` role
    #[instrument(skip(self, request), fields(username = %request.username, email = %request.email))]
    pub async fn signup(&self, request: SignupRequest) -> ServiceResult<AuthResponse> {
        validate_password_strength(&request.password)?;

        let username = request.username.trim().to_string();
        let email = request.email.trim().to_lowercase();

        if User::is_reserved_username(&username) {
            return Err(ServiceError::validation(format!("Username '{username}' is reserved")));
        }
        if self.ctx.user_repo().username_exists(&username).await? {
            return Err(DomainError::UsernameAlreadyExists.into());
        }
        if self.ctx.user_repo().email_exists(&email).await? {
            return Err(DomainError::EmailAlreadyExists.into());
        }

        let password_hash = hash_password(&request.password)?;

        let mut user = User::new(self.ctx.generate_id(), username, email);
        user.set_bio(request.bio);

        self.ctx.user_repo().create(&user, &password_hash).await?;

        info!(user_id = %user.id, "User signed up");

        let tokens = self.issue_tokens(&user)?;
        Ok(auth_response(tokens, &user))
    }

    /// Login with email and password
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        let email = request.email.trim().to_lowercase();

        let user = self
            .ctx
            .user_repo()
            .find_by_email(&email)
            .await?
            .ok_or_else(|| {
                warn!("Login failed: unknown email");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        let password_hash = self
            .ctx
            .user_repo()
            .get_password_hash(user.id)
            .await?
            .ok_or(ServiceError::App(AppError::InvalidCredentials))?;

        if !verify_password(&request.password, &password_hash)? {
            warn!(user_id = %user.id, "Login failed: invalid password");
            return Err(ServiceError::App(AppError::InvalidCredentials));
        }

        if !user.active {
            warn!(user_id = %user.id, "Login refused: account deactivated");
            return Err(DomainError::AccountDeactivated.into());
        }

        info!(user_id = %user.id, "User logged in");

        let tokens = self.issue_tokens(&user)?;
        Ok(auth_response(tokens, &user))
    }

    /// Exchange a refresh token for a new token pair
    #[instrument(skip(self, request))]
    pub async fn refresh(&self, request: RefreshTokenRequest) -> ServiceResult<AuthResponse> {
        let claims = self
            .ctx
            .jwt_service()
            .validate_refresh_token(&request.refresh_token)?;
        let user_id = claims.user_id()?;

        // A token for a deleted account is just an invalid token
        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(ServiceError::App(AppError::InvalidToken))?;

        if !user.active {
            return Err(DomainError::AccountDeactivated.into());
        }

        info!(user_id = %user.id, "Tokens refreshed");

        let tokens = self.issue_tokens(&user)?;
        Ok(auth_response(tokens, &user))
    }

    fn issue_tokens(&self, user: &User) -> ServiceResult<TokenPair> {
        Ok(self.ctx.jwt_service().generate_token_pair(user.id, user.role)?)
    }
}

fn auth_response(tokens: TokenPair, user: &User) -> AuthResponse {
    AuthResponse::new(
        tokens.access_token,
        tokens.refresh_token,
        tokens.expires_in,
        ProfileResponse::from(user),
    )
}
