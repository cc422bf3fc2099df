//! In-memory repositories
//!
//! All tables live behind one `RwLock`, so every write (including the
//! cascades) becomes visible in a single step. Reaction reconciliation
//! additionally takes a per-comment async mutex, mirroring the row lock
//! the PostgreSQL store takes.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;
use rand::seq::SliceRandom;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::instrument;

use recipe_core::entities::{Comment, CommentReaction, Recipe, RecipeFilter, RecipeStats, User};
use recipe_core::error::DomainError;
use recipe_core::traits::{
    CommentRepository, ReactionRepository, ReactionTransaction, RecipeRepository, RepoResult,
    UserRepository,
};
use recipe_core::value_objects::{ReactionKind, Snowflake};

use super::transaction::MemoryReactionTransaction;

#[derive(Debug, Default)]
pub(super) struct Tables {
    pub users: HashMap<Snowflake, (User, String)>,
    pub recipes: HashMap<Snowflake, Recipe>,
    /// (user, recipe, saved_at) in save order
    pub saved: Vec<(Snowflake, Snowflake, DateTime<Utc>)>,
    pub comments: HashMap<Snowflake, Comment>,
    pub reactions: HashMap<(Snowflake, Snowflake), CommentReaction>,
}

impl Tables {
    fn remove_comments<F>(&mut self, doomed: F)
    where
        F: Fn(&Comment) -> bool,
    {
        let ids: HashSet<Snowflake> = self
            .comments
            .values()
            .filter(|c| doomed(c))
            .map(|c| c.id)
            .collect();
        self.comments.retain(|id, _| !ids.contains(id));
        self.reactions.retain(|(_, comment_id), _| !ids.contains(comment_id));
    }

    fn remove_recipes<F>(&mut self, doomed: F)
    where
        F: Fn(&Recipe) -> bool,
    {
        let ids: HashSet<Snowflake> = self
            .recipes
            .values()
            .filter(|r| doomed(r))
            .map(|r| r.id)
            .collect();
        self.recipes.retain(|id, _| !ids.contains(id));
        self.saved.retain(|(_, recipe_id, _)| !ids.contains(recipe_id));
        self.remove_comments(|c| ids.contains(&c.recipe_id));
    }

    /// Comments the user has a reaction on, in id order
    fn reacted_comments_of(&self, user_id: Snowflake) -> Vec<Snowflake> {
        let mut ids: Vec<Snowflake> = self
            .reactions
            .keys()
            .filter(|(u, _)| *u == user_id)
            .map(|(_, comment_id)| *comment_id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Drop a user's reactions, taking them off the counters first.
    /// The caller holds the comment locks of every affected comment.
    fn retract_reactions_of(&mut self, user_id: Snowflake) {
        let mine: Vec<CommentReaction> = self
            .reactions
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();

        for reaction in mine {
            if let Some(comment) = self.comments.get_mut(&reaction.comment_id) {
                match reaction.kind {
                    ReactionKind::Like => comment.decrement_likes(),
                    ReactionKind::Dislike => comment.decrement_dislikes(),
                }
            }
            self.reactions.remove(&(reaction.user_id, reaction.comment_id));
        }
    }
}

#[derive(Debug, Default)]
pub(super) struct Inner {
    pub tables: RwLock<Tables>,
    pub comment_locks: DashMap<Snowflake, Arc<Mutex<()>>>,
}

impl Inner {
    pub fn comment_lock(&self, comment_id: Snowflake) -> Arc<Mutex<()>> {
        self.comment_locks.entry(comment_id).or_default().clone()
    }

    /// Lock the given comments in id order, the order every multi-comment
    /// writer uses
    async fn lock_comments(&self, comment_ids: &[Snowflake]) -> Vec<OwnedMutexGuard<()>> {
        let mut guards = Vec::with_capacity(comment_ids.len());
        for comment_id in comment_ids {
            guards.push(self.comment_lock(*comment_id).lock_owned().await);
        }
        guards
    }
}

/// In-memory implementation of every repository trait
///
/// Cloning shares the underlying tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(super) fn tracked_comment_locks(&self) -> usize {
        self.inner.comment_locks.len()
    }

    /// Number of stored reactions of each kind on a comment
    pub fn reaction_counts(&self, comment_id: Snowflake) -> (i32, i32) {
        let tables = self.inner.tables.read();
        tables
            .reactions
            .values()
            .filter(|r| r.comment_id == comment_id)
            .fold((0, 0), |(likes, dislikes), r| match r.kind {
                ReactionKind::Like => (likes + 1, dislikes),
                ReactionKind::Dislike => (likes, dislikes + 1),
            })
    }
}

fn newest_first<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> (DateTime<Utc>, Snowflake),
{
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

// ============================================================================
// Users
// ============================================================================

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        Ok(self.inner.tables.read().users.get(&id).map(|(u, _)| u.clone()))
    }

    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<User>> {
        let tables = self.inner.tables.read();
        Ok(ids
            .iter()
            .collect::<HashSet<_>>()
            .into_iter()
            .filter_map(|id| tables.users.get(id).map(|(u, _)| u.clone()))
            .collect())
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let tables = self.inner.tables.read();
        Ok(tables
            .users
            .values()
            .find(|(u, _)| u.email.eq_ignore_ascii_case(email))
            .map(|(u, _)| u.clone()))
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let tables = self.inner.tables.read();
        Ok(tables
            .users
            .values()
            .find(|(u, _)| u.username == username)
            .map(|(u, _)| u.clone()))
    }

    async fn username_exists(&self, username: &str) -> RepoResult<bool> {
        Ok(self.find_by_username(username).await?.is_some())
    }

    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    async fn find_all(&self) -> RepoResult<Vec<User>> {
        let mut users: Vec<User> = self
            .inner
            .tables
            .read()
            .users
            .values()
            .map(|(u, _)| u.clone())
            .collect();
        users.sort_by_key(|u| (u.created_at, u.id));
        Ok(users)
    }

    #[instrument(skip(self, user, password_hash), fields(user_id = %user.id))]
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()> {
        let mut tables = self.inner.tables.write();
        if tables.users.values().any(|(u, _)| u.username == user.username) {
            return Err(DomainError::UsernameAlreadyExists);
        }
        if tables.users.values().any(|(u, _)| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(DomainError::EmailAlreadyExists);
        }
        tables.users.insert(user.id, (user.clone(), password_hash.to_string()));
        Ok(())
    }

    async fn update(&self, user: &User) -> RepoResult<()> {
        let mut tables = self.inner.tables.write();
        let mut others = tables.users.values().map(|(u, _)| u).filter(|u| u.id != user.id);
        if others.clone().any(|u| u.username == user.username) {
            return Err(DomainError::UsernameAlreadyExists);
        }
        if others.any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(DomainError::EmailAlreadyExists);
        }

        let (stored, _) = tables
            .users
            .get_mut(&user.id)
            .ok_or(DomainError::UserNotFound(user.id))?;
        *stored = user.clone();
        stored.updated_at = Utc::now();
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        // Retracting reactions writes counters, so it waits for any
        // reconciliation in flight on those comments. If the user reacted
        // somewhere new while the locks were being taken, start over.
        loop {
            let targets = self.inner.tables.read().reacted_comments_of(id);
            let _guards = self.inner.lock_comments(&targets).await;

            let mut tables = self.inner.tables.write();
            if !tables.users.contains_key(&id) {
                return Err(DomainError::UserNotFound(id));
            }
            let covered = tables
                .reacted_comments_of(id)
                .iter()
                .all(|c| targets.binary_search(c).is_ok());
            if !covered {
                continue;
            }

            tables.users.remove(&id);
            tables.retract_reactions_of(id);
            tables.saved.retain(|(user_id, _, _)| *user_id != id);
            tables.remove_recipes(|r| r.owner_id == id);
            tables.remove_comments(|c| c.author_id == id);
            return Ok(());
        }
    }

    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>> {
        Ok(self.inner.tables.read().users.get(&id).map(|(_, h)| h.clone()))
    }

    async fn update_password(&self, id: Snowflake, password_hash: &str) -> RepoResult<()> {
        let mut tables = self.inner.tables.write();
        let (user, hash) = tables.users.get_mut(&id).ok_or(DomainError::UserNotFound(id))?;
        *hash = password_hash.to_string();
        user.updated_at = Utc::now();
        Ok(())
    }
}

// ============================================================================
// Recipes
// ============================================================================

#[async_trait]
impl RecipeRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Recipe>> {
        Ok(self.inner.tables.read().recipes.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<Recipe>> {
        let tables = self.inner.tables.read();
        Ok(ids
            .iter()
            .collect::<HashSet<_>>()
            .into_iter()
            .filter_map(|id| tables.recipes.get(id).cloned())
            .collect())
    }

    async fn find_all(&self) -> RepoResult<Vec<Recipe>> {
        self.search(&RecipeFilter::default()).await
    }

    async fn find_by_owner(&self, owner_id: Snowflake) -> RepoResult<Vec<Recipe>> {
        let mut recipes: Vec<Recipe> = self
            .inner
            .tables
            .read()
            .recipes
            .values()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect();
        newest_first(&mut recipes, |r| (r.created_at, r.id));
        Ok(recipes)
    }

    async fn search(&self, filter: &RecipeFilter) -> RepoResult<Vec<Recipe>> {
        let mut recipes: Vec<Recipe> = self
            .inner
            .tables
            .read()
            .recipes
            .values()
            .filter(|r| r.matches(filter))
            .cloned()
            .collect();
        newest_first(&mut recipes, |r| (r.created_at, r.id));
        Ok(recipes)
    }

    async fn find_top_rated(&self, limit: i64) -> RepoResult<Vec<Recipe>> {
        let mut recipes = RecipeRepository::find_all(self).await?;
        // Stable sort keeps newest-first among equal ratings
        recipes.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        recipes.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(recipes)
    }

    async fn find_random(&self, limit: i64, exclude: Option<Snowflake>) -> RepoResult<Vec<Recipe>> {
        let mut recipes: Vec<Recipe> = self
            .inner
            .tables
            .read()
            .recipes
            .values()
            .filter(|r| Some(r.id) != exclude)
            .cloned()
            .collect();
        recipes.shuffle(&mut rand::thread_rng());
        recipes.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(recipes)
    }

    async fn create(&self, recipe: &Recipe) -> RepoResult<()> {
        let mut tables = self.inner.tables.write();
        if !tables.users.contains_key(&recipe.owner_id) {
            return Err(DomainError::UserNotFound(recipe.owner_id));
        }
        tables.recipes.insert(recipe.id, recipe.clone());
        Ok(())
    }

    async fn update(&self, recipe: &Recipe) -> RepoResult<()> {
        let mut tables = self.inner.tables.write();
        let stored = tables
            .recipes
            .get_mut(&recipe.id)
            .ok_or(DomainError::RecipeNotFound(recipe.id))?;
        // Rating and publication state have their own operations
        let (rating, active) = (stored.rating, stored.active);
        *stored = recipe.clone();
        stored.rating = rating;
        stored.active = active;
        stored.updated_at = Utc::now();
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let mut tables = self.inner.tables.write();
        if !tables.recipes.contains_key(&id) {
            return Err(DomainError::RecipeNotFound(id));
        }
        tables.remove_recipes(|r| r.id == id);
        Ok(())
    }

    async fn set_active(&self, id: Snowflake, active: bool) -> RepoResult<()> {
        let mut tables = self.inner.tables.write();
        let recipe = tables.recipes.get_mut(&id).ok_or(DomainError::RecipeNotFound(id))?;
        recipe.active = active;
        recipe.touch();
        Ok(())
    }

    async fn update_rating(&self, id: Snowflake, rating: f64) -> RepoResult<()> {
        let mut tables = self.inner.tables.write();
        let recipe = tables.recipes.get_mut(&id).ok_or(DomainError::RecipeNotFound(id))?;
        recipe.rating = rating;
        recipe.touch();
        Ok(())
    }

    async fn stats(&self) -> RepoResult<RecipeStats> {
        let tables = self.inner.tables.read();
        let total = tables.recipes.len() as i64;
        let published = tables.recipes.values().filter(|r| r.active).count() as i64;
        Ok(RecipeStats {
            total,
            published,
            pending: total - published,
        })
    }

    async fn save_for_user(&self, user_id: Snowflake, recipe_id: Snowflake) -> RepoResult<()> {
        let mut tables = self.inner.tables.write();
        if !tables.users.contains_key(&user_id) {
            return Err(DomainError::UserNotFound(user_id));
        }
        if !tables.recipes.contains_key(&recipe_id) {
            return Err(DomainError::RecipeNotFound(recipe_id));
        }
        if !tables.saved.iter().any(|(u, r, _)| *u == user_id && *r == recipe_id) {
            tables.saved.push((user_id, recipe_id, Utc::now()));
        }
        Ok(())
    }

    async fn unsave_for_user(&self, user_id: Snowflake, recipe_id: Snowflake) -> RepoResult<()> {
        self.inner
            .tables
            .write()
            .saved
            .retain(|(u, r, _)| !(*u == user_id && *r == recipe_id));
        Ok(())
    }

    async fn is_saved_by_user(&self, user_id: Snowflake, recipe_id: Snowflake) -> RepoResult<bool> {
        Ok(self
            .inner
            .tables
            .read()
            .saved
            .iter()
            .any(|(u, r, _)| *u == user_id && *r == recipe_id))
    }

    async fn find_saved_by_user(&self, user_id: Snowflake) -> RepoResult<Vec<Recipe>> {
        let tables = self.inner.tables.read();
        Ok(tables
            .saved
            .iter()
            .rev()
            .filter(|(u, _, _)| *u == user_id)
            .filter_map(|(_, r, _)| tables.recipes.get(r).cloned())
            .collect())
    }
}

// ============================================================================
// Comments
// ============================================================================

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Comment>> {
        Ok(self.inner.tables.read().comments.get(&id).cloned())
    }

    async fn find_by_recipe(&self, recipe_id: Snowflake) -> RepoResult<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .inner
            .tables
            .read()
            .comments
            .values()
            .filter(|c| c.recipe_id == recipe_id)
            .cloned()
            .collect();
        comments.sort_by_key(|c| (c.created_at, c.id));
        Ok(comments)
    }

    async fn find_all(&self) -> RepoResult<Vec<Comment>> {
        let mut comments: Vec<Comment> = self.inner.tables.read().comments.values().cloned().collect();
        newest_first(&mut comments, |c| (c.created_at, c.id));
        Ok(comments)
    }

    async fn create(&self, comment: &Comment) -> RepoResult<()> {
        let mut tables = self.inner.tables.write();
        if !tables.recipes.contains_key(&comment.recipe_id) {
            return Err(DomainError::RecipeNotFound(comment.recipe_id));
        }
        if !tables.users.contains_key(&comment.author_id) {
            return Err(DomainError::UserNotFound(comment.author_id));
        }
        tables.comments.insert(comment.id, comment.clone());
        Ok(())
    }

    async fn update_text(&self, comment: &Comment) -> RepoResult<()> {
        let mut tables = self.inner.tables.write();
        let stored = tables
            .comments
            .get_mut(&comment.id)
            .ok_or(DomainError::CommentNotFound(comment.id))?;
        stored.set_text(comment.text.clone());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        {
            let mut tables = self.inner.tables.write();
            if !tables.comments.contains_key(&id) {
                return Err(DomainError::CommentNotFound(id));
            }
            tables.remove_comments(|c| c.id == id);
        }
        self.inner.comment_locks.remove(&id);
        Ok(())
    }

    async fn set_reported(&self, id: Snowflake, reported: bool) -> RepoResult<()> {
        let mut tables = self.inner.tables.write();
        let comment = tables.comments.get_mut(&id).ok_or(DomainError::CommentNotFound(id))?;
        comment.reported = reported;
        Ok(())
    }
}

// ============================================================================
// Reactions
// ============================================================================

#[async_trait]
impl ReactionRepository for MemoryStore {
    async fn find(&self, user_id: Snowflake, comment_id: Snowflake) -> RepoResult<Option<CommentReaction>> {
        Ok(self
            .inner
            .tables
            .read()
            .reactions
            .get(&(user_id, comment_id))
            .cloned())
    }

    async fn find_bulk(
        &self,
        user_id: Snowflake,
        comment_ids: &[Snowflake],
    ) -> RepoResult<HashMap<Snowflake, CommentReaction>> {
        let tables = self.inner.tables.read();
        Ok(comment_ids
            .iter()
            .filter_map(|comment_id| {
                tables
                    .reactions
                    .get(&(user_id, *comment_id))
                    .map(|r| (*comment_id, r.clone()))
            })
            .collect())
    }

    async fn begin(&self) -> RepoResult<Box<dyn ReactionTransaction>> {
        Ok(Box::new(MemoryReactionTransaction::new(Arc::clone(&self.inner))))
    }
}
