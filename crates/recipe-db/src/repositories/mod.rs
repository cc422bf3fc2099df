//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in recipe-core.

mod comment;
mod error;
mod reaction;
mod recipe;
mod user;

pub use comment::PgCommentRepository;
pub use reaction::{PgReactionRepository, PgReactionTransaction};
pub use recipe::PgRecipeRepository;
pub use user::PgUserRepository;
