//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(Snowflake),

    #[error("Recipe not found: {0}")]
    RecipeNotFound(Snowflake),

    #[error("Comment not found: {0}")]
    CommentNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Not the recipe owner")]
    NotRecipeOwner,

    #[error("Not the comment author")]
    NotCommentAuthor,

    #[error("Administrator role required")]
    AdminRequired,

    #[error("Account is deactivated")]
    AccountDeactivated,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Username already taken")]
    UsernameAlreadyExists,

    #[error("Email already in use")]
    EmailAlreadyExists,

    #[error("Reaction already exists for this user and comment")]
    ReactionAlreadyExists,

    // =========================================================================
    // Infrastructure Errors
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::RecipeNotFound(_) => "UNKNOWN_RECIPE",
            Self::CommentNotFound(_) => "UNKNOWN_COMMENT",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",

            // Authorization
            Self::NotRecipeOwner => "NOT_RECIPE_OWNER",
            Self::NotCommentAuthor => "NOT_COMMENT_AUTHOR",
            Self::AdminRequired => "ADMIN_REQUIRED",
            Self::AccountDeactivated => "ACCOUNT_DEACTIVATED",

            // Conflict
            Self::UsernameAlreadyExists => "USERNAME_EXISTS",
            Self::EmailAlreadyExists => "EMAIL_EXISTS",
            Self::ReactionAlreadyExists => "REACTION_EXISTS",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_) | Self::RecipeNotFound(_) | Self::CommentNotFound(_)
        )
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_))
    }

    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::NotRecipeOwner
                | Self::NotCommentAuthor
                | Self::AdminRequired
                | Self::AccountDeactivated
        )
    }

    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::UsernameAlreadyExists | Self::EmailAlreadyExists | Self::ReactionAlreadyExists
        )
    }
}
