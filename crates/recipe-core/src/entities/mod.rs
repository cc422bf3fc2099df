//! Domain entities - core business objects

mod comment;
mod comment_reaction;
mod recipe;
mod user;

pub use comment::Comment;
pub use comment_reaction::CommentReaction;
pub use recipe::{Recipe, RecipeFilter, RecipeStats};
pub use user::{User, RESERVED_USERNAMES};
