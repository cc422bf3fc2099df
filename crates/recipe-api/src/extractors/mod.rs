//! Axum extractors for authentication, validation and path ids

mod auth;
mod path;
mod validated;

pub use auth::{AuthUser, OptionalAuthUser};
pub use path::{CommentIdPath, RecipeIdPath, UserIdPath, UsernamePath};
pub use validated::{ValidatedJson, ValidatedQuery};
