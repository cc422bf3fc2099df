//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs are serialized as strings for JavaScript compatibility.

use chrono::{DateTime, Utc};
use serde::Serialize;

// ============================================================================
// Auth Responses
// ============================================================================

/// Authentication response with tokens
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: ProfileResponse,
}

impl AuthResponse {
    pub fn new(access_token: String, refresh_token: String, expires_in: i64, user: ProfileResponse) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in,
            user,
        }
    }
}

// ============================================================================
// User Responses
// ============================================================================

/// The caller's own profile; also what administrators see
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub role: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Public user profile (no email)
#[derive(Debug, Clone, Serialize)]
pub struct PublicUserResponse {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SavedStatusResponse {
    pub saved: bool,
}

// ============================================================================
// Recipe Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct RecipeResponse {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub time_in_mins: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<i32>,
    pub servings: i32,
    pub rating: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_ingredient: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct RecipeStatsResponse {
    pub total: i64,
    pub published: i64,
    pub pending: i64,
}

// ============================================================================
// Comment Responses
// ============================================================================

/// A comment as shown under a recipe, from the viewer's point of view
///
/// At most one of `user_liked` / `user_disliked` is true.
#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub id: String,
    pub recipe_id: String,
    pub author_id: String,
    /// Author's username
    pub author: String,
    pub text: String,
    /// Relative time, e.g. "5 minutes ago"
    pub time: String,
    pub created_at: DateTime<Utc>,
    pub likes: i32,
    pub dislikes: i32,
    pub user_liked: bool,
    pub user_disliked: bool,
    pub rating: f64,
}

/// Comment row in the moderation list
#[derive(Debug, Clone, Serialize)]
pub struct AdminCommentResponse {
    pub id: String,
    pub text: String,
    pub author_id: String,
    pub username: String,
    pub recipe_id: String,
    pub recipe_title: String,
    pub likes: i32,
    pub dislikes: i32,
    pub reported: bool,
    pub created_at: DateTime<Utc>,
    /// dd/MM/yyyy HH:mm
    pub formatted_date: String,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool) -> Self {
        Self {
            status: if database_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_response_serialization() {
        let user = ProfileResponse {
            id: "123456789".to_string(),
            username: "chef".to_string(),
            email: "chef@example.com".to_string(),
            bio: None,
            role: "USER".to_string(),
            active: true,
            created_at: Utc::now(),
        };
        let response = AuthResponse::new("access".into(), "refresh".into(), 3600, user);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["token_type"], "Bearer");
        assert_eq!(json["user"]["id"], "123456789");
        assert!(json["user"].get("bio").is_none());
    }

    #[test]
    fn test_readiness_response() {
        let ready = ReadinessResponse::ready(true);
        assert!(ready.is_ready());
        assert_eq!(ready.checks.database, "healthy");

        let not_ready = ReadinessResponse::ready(false);
        assert_eq!(not_ready.status, "not_ready");
        assert_eq!(not_ready.checks.database, "unhealthy");
    }
}
