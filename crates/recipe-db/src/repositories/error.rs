//! Error handling utilities for repositories

use recipe_core::error::DomainError;
use sqlx::Error as SqlxError;

const USERNAME_CONSTRAINT: &str = "users_username_unique";
const REACTION_CONSTRAINT: &str = "comment_reactions_user_comment_unique";

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce(Option<&str>) -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique(db_err.constraint());
        }
    }
    map_db_error(e)
}

/// Unique violations on `users` name the clashing column
pub fn map_user_violation(e: SqlxError) -> DomainError {
    map_unique_violation(e, |constraint| match constraint {
        Some(USERNAME_CONSTRAINT) => DomainError::UsernameAlreadyExists,
        _ => DomainError::EmailAlreadyExists,
    })
}

pub fn map_reaction_violation(e: SqlxError) -> DomainError {
    map_unique_violation(e, |constraint| match constraint {
        Some(REACTION_CONSTRAINT) | None => DomainError::ReactionAlreadyExists,
        Some(other) => DomainError::DatabaseError(format!("unique violation on {other}")),
    })
}

/// Turn "no row affected" into the entity's not-found error
pub fn ensure_affected<F>(rows: u64, not_found: F) -> Result<(), DomainError>
where
    F: FnOnce() -> DomainError,
{
    if rows == 0 {
        Err(not_found())
    } else {
        Ok(())
    }
}
