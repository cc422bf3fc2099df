//! Authentication handlers

use axum::{extract::State, Json};
use recipe_service::{AuthResponse, AuthService, LoginRequest, RefreshTokenRequest, SignupRequest};

use crate::extractors::ValidatedJson;
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Create an account
///
/// POST /auth/signup
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SignupRequest>,
) -> ApiResult<Created<Json<AuthResponse>>> {
    let service = AuthService::new(state.service_context());
    let response = service.signup(request).await?;
    Ok(Created(Json(response)))
}

/// Login with email and password
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.login(request).await?;
    Ok(Json(response))
}

/// Exchange a refresh token for a new pair
///
/// POST /auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshTokenRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.refresh(request).await?;
    Ok(Json(response))
}
