//! # recipe-db
//!
//! Persistence layer implementing the `recipe-core` repository traits.
//!
//! - PostgreSQL repositories over a SQLx connection pool, with the schema
//!   kept in `migrations/`
//! - Row models and row-to-entity mappers
//! - [`MemoryStore`], an in-memory implementation of the same traits
//!
//! ```rust,ignore
//! use recipe_db::{create_pool, run_migrations, PgCommentRepository, PoolConfig};
//!
//! let pool = create_pool(&PoolConfig::default()).await?;
//! run_migrations(&pool).await?;
//! let comments = PgCommentRepository::new(pool);
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::MemoryStore;
pub use pool::{create_pool, run_migrations, PgPool, PoolConfig};
pub use repositories::{
    PgCommentRepository, PgReactionRepository, PgRecipeRepository, PgUserRepository,
};
