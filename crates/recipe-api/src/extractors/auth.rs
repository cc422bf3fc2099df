//! Authentication extractors
//!
//! Read `Authorization: Bearer <jwt>` and validate it as an access token.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use recipe_core::{Snowflake, UserRole};

use crate::response::ApiError;
use crate::state::AppState;

/// Authenticated caller
///
/// `role` is what the token claims; services re-read the stored role
/// before anything privileged.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Snowflake,
    pub role: UserRole,
}

fn authenticate(state: &AppState, token: &str) -> Result<AuthUser, ApiError> {
    let claims = state.jwt_service().validate_access_token(token).map_err(|e| {
        tracing::warn!(error = %e, "Invalid access token");
        ApiError::InvalidToken
    })?;

    let user_id = claims.user_id().map_err(|e| {
        tracing::warn!(error = %e, "Invalid user id in token");
        ApiError::InvalidToken
    })?;

    Ok(AuthUser {
        user_id,
        role: claims.role,
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingAuth)?;

        authenticate(&AppState::from_ref(state), bearer.token())
    }
}

/// Caller identity when a token is sent, `None` for anonymous requests
///
/// A token that is present but invalid is still rejected.
#[derive(Debug, Clone, Copy)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

impl OptionalAuthUser {
    pub fn user_id(&self) -> Option<Snowflake> {
        self.0.map(|u| u.user_id)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await {
            Ok(TypedHeader(Authorization(bearer))) => {
                let user = authenticate(&AppState::from_ref(state), bearer.token())?;
                Ok(Self(Some(user)))
            }
            Err(_) => Ok(Self(None)),
        }
    }
}
