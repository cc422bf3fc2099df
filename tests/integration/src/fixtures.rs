//! Request bodies and response shapes used by the integration tests

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Suffix that stays unique across runs against the same database
pub fn unique_suffix() -> String {
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() % 100_000)
        .unwrap_or(0);
    format!("{secs}{n}")
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl SignupRequest {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            username: format!("cook{suffix}"),
            email: format!("cook{suffix}@example.com"),
            password: "Simmer2024".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn from_signup(signup: &SignupRequest) -> Self {
        Self {
            email: signup.email.clone(),
            password: signup.password.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub user: ProfileResponse,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

#[derive(Debug, Deserialize)]
pub struct ProfileResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: String,
    pub active: bool,
}

#[derive(Debug, Serialize)]
pub struct CreateRecipeRequest {
    pub title: String,
    pub time_in_mins: i32,
    pub servings: i32,
    pub cuisine: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}

impl CreateRecipeRequest {
    pub fn unique() -> Self {
        Self {
            title: format!("Test Recipe {}", unique_suffix()),
            time_in_mins: 25,
            servings: 2,
            cuisine: Some("Italian".to_string()),
            ingredients: vec!["pasta".to_string(), "garlic".to_string()],
            instructions: vec!["boil".to_string(), "toss".to_string()],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RecipeResponse {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub rating: f64,
    pub active: bool,
}

#[derive(Debug, Serialize)]
pub struct CommentTextRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct CommentView {
    pub id: String,
    pub author: String,
    pub text: String,
    pub time: String,
    pub likes: i32,
    pub dislikes: i32,
    pub user_liked: bool,
    pub user_disliked: bool,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}
