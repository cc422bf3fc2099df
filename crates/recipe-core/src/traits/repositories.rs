//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer states what it needs; `recipe-db` provides the
//! PostgreSQL and in-memory implementations.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::entities::{Comment, CommentReaction, Recipe, RecipeFilter, RecipeStats, User};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    /// Find several users at once; unknown ids are skipped
    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<User>>;

    /// Find user by email
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Find user by username
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;

    /// Check if username is already taken
    async fn username_exists(&self, username: &str) -> RepoResult<bool>;

    /// Check if email is already taken
    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    /// List every account, oldest first
    async fn find_all(&self) -> RepoResult<Vec<User>>;

    /// Create a new user
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()>;

    /// Update profile fields, role and active flag
    async fn update(&self, user: &User) -> RepoResult<()>;

    /// Delete a user together with their recipes, comments and reactions
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>>;

    /// Update password hash
    async fn update_password(&self, id: Snowflake, password_hash: &str) -> RepoResult<()>;
}

// ============================================================================
// Recipe Repository
// ============================================================================

#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Find recipe by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Recipe>>;

    /// Find several recipes at once; unknown ids are skipped
    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<Recipe>>;

    /// List every recipe, newest first
    async fn find_all(&self) -> RepoResult<Vec<Recipe>>;

    /// List a user's recipes, newest first
    async fn find_by_owner(&self, owner_id: Snowflake) -> RepoResult<Vec<Recipe>>;

    /// List recipes matching every criterion of the filter, newest first
    async fn search(&self, filter: &RecipeFilter) -> RepoResult<Vec<Recipe>>;

    /// Highest rated recipes
    async fn find_top_rated(&self, limit: i64) -> RepoResult<Vec<Recipe>>;

    /// Random selection, optionally leaving one recipe out
    async fn find_random(&self, limit: i64, exclude: Option<Snowflake>) -> RepoResult<Vec<Recipe>>;

    /// Create a new recipe
    async fn create(&self, recipe: &Recipe) -> RepoResult<()>;

    /// Update recipe content
    async fn update(&self, recipe: &Recipe) -> RepoResult<()>;

    /// Delete a recipe together with its comments and their reactions
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;

    /// Publish or unpublish
    async fn set_active(&self, id: Snowflake, active: bool) -> RepoResult<()>;

    /// Overwrite the rating
    async fn update_rating(&self, id: Snowflake, rating: f64) -> RepoResult<()>;

    /// Count all, published and pending recipes
    async fn stats(&self) -> RepoResult<RecipeStats>;

    /// Add a recipe to a user's saved list; saving twice is a no-op
    async fn save_for_user(&self, user_id: Snowflake, recipe_id: Snowflake) -> RepoResult<()>;

    /// Remove a recipe from a user's saved list; a missing entry is a no-op
    async fn unsave_for_user(&self, user_id: Snowflake, recipe_id: Snowflake) -> RepoResult<()>;

    /// Check whether a user saved a recipe
    async fn is_saved_by_user(&self, user_id: Snowflake, recipe_id: Snowflake) -> RepoResult<bool>;

    /// List a user's saved recipes, most recently saved first
    async fn find_saved_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<Recipe>>;
}

// ============================================================================
// Comment Repository
// ============================================================================

#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Find comment by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Comment>>;

    /// List a recipe's comments in creation order
    async fn find_by_recipe(&self, recipe_id: Snowflake) -> RepoResult<Vec<Comment>>;

    /// List every comment, newest first
    async fn find_all(&self) -> RepoResult<Vec<Comment>>;

    /// Create a new comment
    async fn create(&self, comment: &Comment) -> RepoResult<()>;

    /// Update the comment text; counters are left untouched
    async fn update_text(&self, comment: &Comment) -> RepoResult<()>;

    /// Delete a comment together with its reactions
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;

    /// Set or clear the moderation flag
    async fn set_reported(&self, id: Snowflake, reported: bool) -> RepoResult<()>;
}

// ============================================================================
// Reaction Repository
// ============================================================================

/// Reaction store
///
/// Reads are available directly. Writes happen only inside a
/// [`ReactionTransaction`], which also owns the comment counters.
#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// Find a user's reaction to a comment
    async fn find(&self, user_id: Snowflake, comment_id: Snowflake) -> RepoResult<Option<CommentReaction>>;

    /// Find a user's reactions to a set of comments in one lookup, keyed by comment id
    async fn find_bulk(
        &self,
        user_id: Snowflake,
        comment_ids: &[Snowflake],
    ) -> RepoResult<HashMap<Snowflake, CommentReaction>>;

    /// Open a unit of work for reconciling one reaction
    async fn begin(&self) -> RepoResult<Box<dyn ReactionTransaction>>;
}

/// Unit of work over the reaction store and comment counters
///
/// Nothing written through it is visible to other readers before
/// [`commit`](ReactionTransaction::commit). Dropping it without committing
/// discards every write.
#[async_trait]
pub trait ReactionTransaction: Send {
    /// Load a comment and hold it exclusively until the unit of work ends
    async fn lock_comment(&mut self, comment_id: Snowflake) -> RepoResult<Option<Comment>>;

    /// Find a user's reaction to a comment, including uncommitted writes
    async fn find(&mut self, user_id: Snowflake, comment_id: Snowflake) -> RepoResult<Option<CommentReaction>>;

    /// Store a new reaction
    async fn create(&mut self, reaction: &CommentReaction) -> RepoResult<()>;

    /// Change the kind of an existing reaction
    async fn update(&mut self, reaction: &CommentReaction) -> RepoResult<()>;

    /// Remove a reaction
    async fn delete(&mut self, reaction: &CommentReaction) -> RepoResult<()>;

    /// Persist a comment's likes and dislikes
    async fn save_counters(&mut self, comment: &Comment) -> RepoResult<()>;

    /// Make every write visible at once
    async fn commit(self: Box<Self>) -> RepoResult<()>;
}
