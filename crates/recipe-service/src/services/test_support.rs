//! Fixtures for service tests, backed by the in-memory store

use std::sync::Arc;

use recipe_common::{hash_password, JwtService};
use recipe_core::entities::{Comment, Recipe, User};
use recipe_core::traits::{CommentRepository, RecipeRepository, UserRepository};
use recipe_core::{SnowflakeGenerator, UserRole};
use recipe_db::MemoryStore;

use super::context::ServiceContext;

pub const PASSWORD: &str = "password123";

pub struct Fixture {
    pub ctx: ServiceContext,
    pub store: MemoryStore,
}

impl Fixture {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let ctx = ServiceContext::builder()
            .store(store.clone())
            .jwt_service(Arc::new(JwtService::new(
                "test-secret-that-is-at-least-32-chars",
                900,
                3600,
            )))
            .snowflake_generator(Arc::new(SnowflakeGenerator::new(1)))
            .build()
            .unwrap();
        Self { ctx, store }
    }

    pub async fn user(&self, username: &str) -> User {
        let user = User::new(
            self.ctx.generate_id(),
            username.to_string(),
            format!("{username}@example.com"),
        );
        let hash = hash_password(PASSWORD).unwrap();
        UserRepository::create(&self.store, &user, &hash).await.unwrap();
        user
    }

    pub async fn admin(&self, username: &str) -> User {
        let mut user = self.user(username).await;
        user.role = UserRole::Admin;
        UserRepository::update(&self.store, &user).await.unwrap();
        user
    }

    pub async fn recipe(&self, owner: &User, title: &str) -> Recipe {
        let recipe = Recipe::new(self.ctx.generate_id(), owner.id, title.to_string(), 30, 4);
        RecipeRepository::create(&self.store, &recipe).await.unwrap();
        recipe
    }

    pub async fn comment(&self, recipe: &Recipe, author: &User, text: &str) -> Comment {
        let comment = Comment::new(self.ctx.generate_id(), recipe.id, author.id, text.to_string());
        CommentRepository::create(&self.store, &comment).await.unwrap();
        comment
    }

    pub async fn stored_comment(&self, comment: &Comment) -> Comment {
        CommentRepository::find_by_id(&self.store, comment.id)
            .await
            .unwrap()
            .unwrap()
    }
}
