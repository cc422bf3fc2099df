//! Business logic services
//!
//! Every service borrows the shared [`ServiceContext`] and is cheap to create
//! per request.

pub mod access;
pub mod admin;
pub mod auth;
pub mod comment;
pub mod context;
pub mod error;
pub mod reaction;
pub mod recipe;
pub mod user;

#[cfg(test)]
pub(crate) mod test_support;

pub use access::AccessService;
pub use admin::AdminService;
pub use auth::AuthService;
pub use comment::CommentService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use reaction::{ReactionOutcome, ReactionService};
pub use recipe::RecipeService;
pub use user::UserService;
