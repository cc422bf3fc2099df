//! # recipe-core
//!
//! Domain layer for the recipe sharing backend: entities, value objects,
//! the comment reaction state machine and the repository traits the
//! infrastructure layer implements. No I/O lives here.

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{Comment, CommentReaction, Recipe, RecipeFilter, RecipeStats, User};
pub use error::DomainError;
pub use traits::{
    CommentRepository, ReactionRepository, ReactionTransaction, RecipeRepository, RepoResult,
    UserRepository,
};
pub use value_objects::{
    relative_time, CounterDelta, ReactionKind, ReactionState, ReactionTransition, Snowflake,
    SnowflakeGenerator, SnowflakeParseError, StoreMutation, UserRole,
};
