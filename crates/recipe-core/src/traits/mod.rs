//! Repository traits implemented by the persistence layer

mod repositories;

pub use repositories::{
    CommentRepository, ReactionRepository, ReactionTransaction, RecipeRepository, RepoResult,
    UserRepository,
};
