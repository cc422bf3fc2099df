//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use recipe_core::RecipeFilter;
use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Auth Requests
// ============================================================================

/// User signup request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 3, max = 20, message = "Username must be 3-20 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 72, message = "Password must be 8-72 characters"))]
    pub password: String,

    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    pub bio: Option<String>,
}

/// User login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token refresh request
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

// ============================================================================
// User Requests
// ============================================================================

/// Update current user's profile; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 3, max = 20, message = "Username must be 3-20 characters"))]
    pub username: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// Empty string clears the bio
    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    #[validate(length(min = 8, max = 72, message = "Password must be 8-72 characters"))]
    pub new_password: String,
}

// ============================================================================
// Recipe Requests
// ============================================================================

/// Create recipe request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRecipeRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    #[validate(range(min = 1, max = 10080, message = "Total time must be 1-10080 minutes"))]
    pub time_in_mins: i32,

    #[validate(range(min = 0, max = 10080))]
    pub prep_time: Option<i32>,

    #[validate(range(min = 0, max = 10080))]
    pub cook_time: Option<i32>,

    #[validate(range(min = 1, max = 100, message = "Servings must be 1-100"))]
    pub servings: i32,

    #[validate(length(max = 50))]
    pub cuisine: Option<String>,

    #[validate(length(max = 50))]
    pub meal_type: Option<String>,

    #[validate(length(max = 50))]
    pub diet: Option<String>,

    #[validate(length(max = 100))]
    pub main_ingredient: Option<String>,

    #[serde(default)]
    pub ingredients: Vec<String>,

    #[serde(default)]
    pub instructions: Vec<String>,
}

/// Update recipe request; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRecipeRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    #[validate(range(min = 1, max = 10080, message = "Total time must be 1-10080 minutes"))]
    pub time_in_mins: Option<i32>,

    #[validate(range(min = 0, max = 10080))]
    pub prep_time: Option<i32>,

    #[validate(range(min = 0, max = 10080))]
    pub cook_time: Option<i32>,

    #[validate(range(min = 1, max = 100, message = "Servings must be 1-100"))]
    pub servings: Option<i32>,

    #[validate(length(max = 50))]
    pub cuisine: Option<String>,

    #[validate(length(max = 50))]
    pub meal_type: Option<String>,

    #[validate(length(max = 50))]
    pub diet: Option<String>,

    #[validate(length(max = 100))]
    pub main_ingredient: Option<String>,

    pub ingredients: Option<Vec<String>>,

    pub instructions: Option<Vec<String>>,
}

/// Search criteria, accepted both as query string and JSON body
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RecipeFilterRequest {
    pub title: Option<String>,
    pub cuisine: Option<String>,
    pub meal_type: Option<String>,
    pub diet: Option<String>,
    pub main_ingredient: Option<String>,

    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0 and 5"))]
    pub min_rating: Option<f64>,

    #[validate(range(min = 1, message = "Cooking time must be positive"))]
    pub max_cooking_time: Option<i32>,

    #[validate(range(min = 1, message = "Servings must be positive"))]
    pub servings: Option<i32>,
}

impl From<RecipeFilterRequest> for RecipeFilter {
    fn from(req: RecipeFilterRequest) -> Self {
        RecipeFilter {
            title: req.title,
            cuisine: req.cuisine,
            meal_type: req.meal_type,
            diet: req.diet,
            main_ingredient: req.main_ingredient,
            min_rating: req.min_rating,
            max_cooking_time: req.max_cooking_time,
            servings: req.servings,
        }
        .normalized()
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateRatingRequest {
    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0 and 5"))]
    pub rating: f64,
}

// ============================================================================
// Comment Requests
// ============================================================================

/// Create or edit a comment
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CommentTextRequest {
    #[validate(length(min = 1, max = 2000, message = "Comment must be 1-2000 characters"))]
    pub text: String,
}

// ============================================================================
// Admin Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct RecipeStatusRequest {
    pub active: bool,
}
