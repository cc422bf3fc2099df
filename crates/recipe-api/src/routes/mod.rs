//! Route definitions
//!
//! API routes are mounted under /api/v1; health probes live at the root.

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{admin, auth, comments, health, recipes, users};
use crate::state::AppState;

/// API router (health routes excluded so they can skip rate limiting)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Liveness and readiness probes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(recipe_routes())
        .merge(comment_routes())
        .merge(admin_routes())
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/profile", get(users::get_profile).put(users::update_profile))
        .route("/users/change-password", post(users::change_password))
        .route("/users/delete-account", delete(users::delete_account))
        .route("/users/my-recipes", get(users::my_recipes))
        .route("/users/saved-recipes", get(users::saved_recipes))
        .route("/users/recipe/:recipe_id/saved", get(users::is_recipe_saved))
        .route("/users/save-recipe/:recipe_id", post(users::save_recipe))
        .route("/users/unsave-recipe/:recipe_id", delete(users::unsave_recipe))
        .route("/users/:username", get(users::get_public_profile))
        .route("/users/:username/recipes", get(users::recipes_by_username))
}

fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(recipes::list_recipes).post(recipes::create_recipe))
        .route("/recipes/search", get(recipes::search_recipes))
        .route("/recipes/filter", post(recipes::filter_recipes))
        .route("/recipes/suggested", get(recipes::suggested_recipes))
        .route("/recipes/random", get(recipes::random_recipes))
        .route(
            "/recipes/:recipe_id",
            get(recipes::get_recipe)
                .put(recipes::update_recipe)
                .delete(recipes::delete_recipe),
        )
        .route("/recipes/:recipe_id/rating", put(recipes::update_rating))
}

fn comment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/comments/recipe/:recipe_id",
            get(comments::list_comments).post(comments::add_comment),
        )
        .route(
            "/comments/:comment_id",
            put(comments::update_comment).delete(comments::delete_comment),
        )
        .route("/comments/:comment_id/like", post(comments::like_comment))
        .route("/comments/:comment_id/dislike", post(comments::dislike_comment))
        .route("/comments/:comment_id/report", post(comments::report_comment))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/:user_id", delete(admin::delete_user))
        .route("/admin/users/:user_id/activate", put(admin::activate_user))
        .route("/admin/users/:user_id/deactivate", put(admin::deactivate_user))
        .route("/admin/recipes", get(admin::list_recipes))
        .route("/admin/recipes/stats", get(admin::recipe_stats))
        .route("/admin/recipes/:recipe_id", delete(admin::delete_recipe))
        .route("/admin/recipes/:recipe_id/status", put(admin::set_recipe_status))
        .route("/admin/comments", get(admin::list_comments))
        .route("/admin/comments/:comment_id", delete(admin::delete_comment))
        .route("/admin/comments/:comment_id/clear-report", put(admin::clear_report))
}
