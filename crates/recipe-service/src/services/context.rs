//! Service context - dependency container for services
//!
//! Holds the repositories, the JWT service and the id generator.

use std::sync::Arc;

use recipe_common::auth::JwtService;
use recipe_core::traits::{CommentRepository, ReactionRepository, RecipeRepository, UserRepository};
use recipe_core::{Snowflake, SnowflakeGenerator};
use recipe_db::PgPool;

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// Passed by reference to every service. The PostgreSQL pool is only
/// present when the repositories are database backed; it is used for
/// readiness checks.
#[derive(Clone)]
pub struct ServiceContext {
    pool: Option<PgPool>,

    user_repo: Arc<dyn UserRepository>,
    recipe_repo: Arc<dyn RecipeRepository>,
    comment_repo: Arc<dyn CommentRepository>,
    reaction_repo: Arc<dyn ReactionRepository>,

    jwt_service: Arc<JwtService>,
    snowflake_generator: Arc<SnowflakeGenerator>,
}

impl ServiceContext {
    /// Start building a context
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    /// Get the PostgreSQL connection pool, if any
    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    // === Repositories ===

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    pub fn recipe_repo(&self) -> &dyn RecipeRepository {
        self.recipe_repo.as_ref()
    }

    pub fn comment_repo(&self) -> &dyn CommentRepository {
        self.comment_repo.as_ref()
    }

    pub fn reaction_repo(&self) -> &dyn ReactionRepository {
        self.reaction_repo.as_ref()
    }

    // === Services ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &self.pool.as_ref().map(|_| "PgPool"))
            .field("repositories", &"...")
            .field("worker_id", &self.snowflake_generator.worker_id())
            .finish()
    }
}

/// Builder for creating ServiceContext
#[derive(Default)]
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    user_repo: Option<Arc<dyn UserRepository>>,
    recipe_repo: Option<Arc<dyn RecipeRepository>>,
    comment_repo: Option<Arc<dyn CommentRepository>>,
    reaction_repo: Option<Arc<dyn ReactionRepository>>,
    jwt_service: Option<Arc<JwtService>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn recipe_repo(mut self, repo: Arc<dyn RecipeRepository>) -> Self {
        self.recipe_repo = Some(repo);
        self
    }

    pub fn comment_repo(mut self, repo: Arc<dyn CommentRepository>) -> Self {
        self.comment_repo = Some(repo);
        self
    }

    pub fn reaction_repo(mut self, repo: Arc<dyn ReactionRepository>) -> Self {
        self.reaction_repo = Some(repo);
        self
    }

    /// Use one store for all four repositories
    pub fn store<S>(self, store: S) -> Self
    where
        S: UserRepository + RecipeRepository + CommentRepository + ReactionRepository + Clone + 'static,
    {
        self.user_repo(Arc::new(store.clone()))
            .recipe_repo(Arc::new(store.clone()))
            .comment_repo(Arc::new(store.clone()))
            .reaction_repo(Arc::new(store))
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        fn required<T>(value: Option<T>, name: &str) -> ServiceResult<T> {
            value.ok_or_else(|| ServiceError::validation(format!("{name} is required")))
        }

        Ok(ServiceContext {
            pool: self.pool,
            user_repo: required(self.user_repo, "user_repo")?,
            recipe_repo: required(self.recipe_repo, "recipe_repo")?,
            comment_repo: required(self.comment_repo, "comment_repo")?,
            reaction_repo: required(self.reaction_repo, "reaction_repo")?,
            jwt_service: required(self.jwt_service, "jwt_service")?,
            snowflake_generator: self
                .snowflake_generator
                .unwrap_or_else(|| Arc::new(SnowflakeGenerator::default())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipe_db::MemoryStore;

    #[test]
    fn test_build_requires_repositories() {
        let err = ServiceContextBuilder::new().build().unwrap_err();
        assert!(err.to_string().contains("user_repo is required"));
    }

    #[test]
    fn test_build_with_store() {
        let ctx = ServiceContext::builder()
            .store(MemoryStore::new())
            .jwt_service(Arc::new(JwtService::new("x".repeat(32).as_str(), 60, 120)))
            .build()
            .unwrap();
        assert!(ctx.pool().is_none());
        assert_ne!(ctx.generate_id(), ctx.generate_id());
    }
}
