//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use chrono::{DateTime, Utc};
use recipe_core::entities::{Comment, Recipe, RecipeStats, User};
use recipe_core::{relative_time, ReactionState};

use super::responses::{
    AdminCommentResponse, CommentView, ProfileResponse, PublicUserResponse, RecipeResponse,
    RecipeStatsResponse,
};

/// Moderation list date format
const ADMIN_DATE_FORMAT: &str = "%d/%m/%Y %H:%M";

// ============================================================================
// User Mappers
// ============================================================================

impl From<&User> for ProfileResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            bio: user.bio.clone(),
            role: user.role.as_str().to_string(),
            active: user.active,
            created_at: user.created_at,
        }
    }
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

impl From<&User> for PublicUserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            bio: user.bio.clone(),
            created_at: user.created_at,
        }
    }
}

// ============================================================================
// Recipe Mappers
// ============================================================================

impl From<Recipe> for RecipeResponse {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id.to_string(),
            owner_id: recipe.owner_id.to_string(),
            title: recipe.title,
            description: recipe.description,
            time_in_mins: recipe.time_in_mins,
            prep_time: recipe.prep_time,
            cook_time: recipe.cook_time,
            servings: recipe.servings,
            rating: recipe.rating,
            cuisine: recipe.cuisine,
            meal_type: recipe.meal_type,
            diet: recipe.diet,
            main_ingredient: recipe.main_ingredient,
            ingredients: recipe.ingredients,
            instructions: recipe.instructions,
            active: recipe.active,
            created_at: recipe.created_at,
            updated_at: recipe.updated_at,
        }
    }
}

impl From<RecipeStats> for RecipeStatsResponse {
    fn from(stats: RecipeStats) -> Self {
        Self {
            total: stats.total,
            published: stats.published,
            pending: stats.pending,
        }
    }
}

// ============================================================================
// Comment Mappers
// ============================================================================

impl CommentView {
    /// Build the view of `comment` for a viewer whose reaction state is `state`
    pub fn assemble(comment: &Comment, author: &str, state: ReactionState, now: DateTime<Utc>) -> Self {
        Self {
            id: comment.id.to_string(),
            recipe_id: comment.recipe_id.to_string(),
            author_id: comment.author_id.to_string(),
            author: author.to_string(),
            text: comment.text.clone(),
            time: relative_time(comment.created_at, now),
            created_at: comment.created_at,
            likes: comment.likes,
            dislikes: comment.dislikes,
            user_liked: state.is_liked(),
            user_disliked: state.is_disliked(),
            rating: comment.rating,
        }
    }
}

impl AdminCommentResponse {
    pub fn new(comment: &Comment, username: &str, recipe_title: &str) -> Self {
        Self {
            id: comment.id.to_string(),
            text: comment.text.clone(),
            author_id: comment.author_id.to_string(),
            username: username.to_string(),
            recipe_id: comment.recipe_id.to_string(),
            recipe_title: recipe_title.to_string(),
            likes: comment.likes,
            dislikes: comment.dislikes,
            reported: comment.reported,
            created_at: comment.created_at,
            formatted_date: comment.created_at.format(ADMIN_DATE_FORMAT).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use recipe_core::Snowflake;

    fn comment() -> Comment {
        let mut c = Comment::new(Snowflake::new(10), Snowflake::new(20), Snowflake::new(30), "Yum".into());
        c.likes = 3;
        c.dislikes = 1;
        c
    }

    #[test]
    fn test_comment_view_flags_follow_state() {
        let c = comment();
        let now = c.created_at + Duration::seconds(90);

        let liked = CommentView::assemble(&c, "ana", ReactionState::Liked, now);
        assert!(liked.user_liked && !liked.user_disliked);
        assert_eq!(liked.time, "1 minute ago");
        assert_eq!(liked.author, "ana");
        assert_eq!((liked.likes, liked.dislikes), (3, 1));

        let none = CommentView::assemble(&c, "ana", ReactionState::None, now);
        assert!(!none.user_liked && !none.user_disliked);
    }

    #[test]
    fn test_comment_view_serializes_ids_as_strings() {
        let view = CommentView::assemble(&comment(), "ana", ReactionState::Disliked, Utc::now());
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["id"], "10");
        assert_eq!(json["recipe_id"], "20");
        assert_eq!(json["user_disliked"], true);
    }

    #[test]
    fn test_admin_comment_date_format() {
        let mut c = comment();
        c.created_at = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 0).unwrap();
        let row = AdminCommentResponse::new(&c, "ana", "Soup");
        assert_eq!(row.formatted_date, "07/03/2024 09:05");
        assert_eq!(row.recipe_title, "Soup");
    }
}
