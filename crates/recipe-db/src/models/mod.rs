//! Database models - SQLx-compatible structs for PostgreSQL tables

mod comment;
mod reaction;
mod recipe;
mod user;

pub use comment::CommentModel;
pub use reaction::CommentReactionModel;
pub use recipe::{RecipeModel, RecipeStatsModel};
pub use user::UserModel;
