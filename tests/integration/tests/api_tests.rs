//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Environment variables: DATABASE_URL, JWT_SECRET
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_json, assert_status, check_test_env, fixtures::*, TestServer,
};
use reqwest::StatusCode;

async fn signup(server: &TestServer) -> (SignupRequest, AuthResponse) {
    let request = SignupRequest::unique();
    let response = server.post("/api/v1/auth/signup", &request).await.unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    (request, auth)
}

async fn create_recipe(server: &TestServer, token: &str) -> RecipeResponse {
    let response = server
        .post_auth("/api/v1/recipes", token, &CreateRecipeRequest::unique())
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_signup() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, auth) = signup(&server).await;

    assert_eq!(auth.user.username, request.username);
    assert_eq!(auth.user.email, request.email);
    assert_eq!(auth.user.role, "USER");
    assert!(auth.user.active);
    assert_eq!(auth.token_type, "Bearer");
    assert!(!auth.access_token.is_empty());
    assert!(!auth.refresh_token.is_empty());
}

#[tokio::test]
async fn test_signup_duplicate_email() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (first, _) = signup(&server).await;

    let mut second = SignupRequest::unique();
    second.email = first.email.clone();

    let response = server.post("/api/v1/auth/signup", &second).await.unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(body.error.code, "EMAIL_EXISTS");
}

#[tokio::test]
async fn test_login() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, _) = signup(&server).await;

    let response = server
        .post("/api/v1/auth/login", &LoginRequest::from_signup(&request))
        .await
        .unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(auth.user.username, request.username);
}

#[tokio::test]
async fn test_login_wrong_password() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, _) = signup(&server).await;

    let login = LoginRequest {
        email: request.email,
        password: "Wrong12345".to_string(),
    };
    let response = server.post("/api/v1/auth/login", &login).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_profile_requires_token() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/api/v1/users/profile").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_get_profile() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (request, auth) = signup(&server).await;

    let response = server
        .get_auth("/api/v1/users/profile", &auth.access_token)
        .await
        .unwrap();
    let profile: ProfileResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(profile.id, auth.user.id);
    assert_eq!(profile.username, request.username);
}

// ============================================================================
// Recipe Tests
// ============================================================================

#[tokio::test]
async fn test_create_and_get_recipe() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, auth) = signup(&server).await;
    let recipe = create_recipe(&server, &auth.access_token).await;

    assert_eq!(recipe.owner_id, auth.user.id);
    assert!(!recipe.active);
    assert!(recipe.rating.abs() < f64::EPSILON);

    let response = server
        .get(&format!("/api/v1/recipes/{}", recipe.id))
        .await
        .unwrap();
    let fetched: RecipeResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(fetched.title, recipe.title);
}

#[tokio::test]
async fn test_search_recipes_by_title() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, auth) = signup(&server).await;
    let recipe = create_recipe(&server, &auth.access_token).await;

    let title = recipe.title.to_lowercase().replace(' ', "%20");
    let response = server
        .get(&format!("/api/v1/recipes/search?title={title}"))
        .await
        .unwrap();
    let found: Vec<RecipeResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(found.iter().any(|r| r.id == recipe.id));
}

#[tokio::test]
async fn test_update_recipe_by_other_user_forbidden() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, owner) = signup(&server).await;
    let (_, other) = signup(&server).await;
    let recipe = create_recipe(&server, &owner.access_token).await;

    let response = server
        .put_auth(
            &format!("/api/v1/recipes/{}", recipe.id),
            &other.access_token,
            &serde_json::json!({ "title": "Stolen" }),
        )
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(body.error.code, "NOT_RECIPE_OWNER");
}

#[tokio::test]
async fn test_get_unknown_recipe() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/api/v1/recipes/1").await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

// ============================================================================
// Comment Tests
// ============================================================================

#[tokio::test]
async fn test_comment_reaction_flow() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, author) = signup(&server).await;
    let (_, reader) = signup(&server).await;
    let recipe = create_recipe(&server, &author.access_token).await;

    let response = server
        .post_auth(
            &format!("/api/v1/comments/recipe/{}", recipe.id),
            &author.access_token,
            &CommentTextRequest {
                text: "Needs more salt".to_string(),
            },
        )
        .await
        .unwrap();
    let comment: CommentView = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(comment.likes, 0);

    let like_path = format!("/api/v1/comments/{}/like", comment.id);
    let dislike_path = format!("/api/v1/comments/{}/dislike", comment.id);

    let response = server.post_empty(&like_path, &reader.access_token).await.unwrap();
    let view: CommentView = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!((view.likes, view.dislikes), (1, 0));
    assert!(view.user_liked);

    // Switching sides moves the reaction
    let response = server.post_empty(&dislike_path, &reader.access_token).await.unwrap();
    let view: CommentView = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!((view.likes, view.dislikes), (0, 1));
    assert!(view.user_disliked && !view.user_liked);

    // Same side again takes it back
    let response = server.post_empty(&dislike_path, &reader.access_token).await.unwrap();
    let view: CommentView = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!((view.likes, view.dislikes), (0, 0));
    assert!(!view.user_disliked);

    let response = server
        .get(&format!("/api/v1/comments/recipe/{}", recipe.id))
        .await
        .unwrap();
    let listed: Vec<CommentView> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].text, "Needs more salt");
    assert_eq!(listed[0].author, author.user.username);
}

#[tokio::test]
async fn test_blank_comment_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, auth) = signup(&server).await;
    let recipe = create_recipe(&server, &auth.access_token).await;

    let response = server
        .post_auth(
            &format!("/api/v1/comments/recipe/{}", recipe.id),
            &auth.access_token,
            &CommentTextRequest {
                text: "   ".to_string(),
            },
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

// ============================================================================
// Admin Tests
// ============================================================================

#[tokio::test]
async fn test_admin_routes_forbidden_for_users() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let (_, auth) = signup(&server).await;

    let response = server
        .get_auth("/api/v1/admin/users", &auth.access_token)
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(body.error.code, "ADMIN_REQUIRED");
}
