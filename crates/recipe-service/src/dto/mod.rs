//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    ChangePasswordRequest, CommentTextRequest, CreateRecipeRequest, LoginRequest,
    RecipeFilterRequest, RecipeStatusRequest, RefreshTokenRequest, SignupRequest,
    UpdateProfileRequest, UpdateRatingRequest, UpdateRecipeRequest,
};

pub use responses::{
    AdminCommentResponse, AuthResponse, CommentView, HealthChecks, HealthResponse,
    ProfileResponse, PublicUserResponse, ReadinessResponse, RecipeResponse, RecipeStatsResponse,
    SavedStatusResponse,
};
