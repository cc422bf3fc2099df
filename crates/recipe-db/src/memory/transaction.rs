//! Reconciliation unit of work for the in-memory store

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OwnedMutexGuard;

use recipe_core::entities::{Comment, CommentReaction};
use recipe_core::error::DomainError;
use recipe_core::traits::{ReactionTransaction, RepoResult};
use recipe_core::value_objects::Snowflake;

use super::store::Inner;

#[derive(Debug, Clone)]
enum Staged {
    Put(CommentReaction),
    Remove { user_id: Snowflake, comment_id: Snowflake },
    Counters { comment_id: Snowflake, likes: i32, dislikes: i32 },
}

/// Holds the comment's mutex from `lock_comment` until commit or drop.
/// Writes are staged and applied under one write lock at commit.
pub struct MemoryReactionTransaction {
    inner: Arc<Inner>,
    guards: Vec<OwnedMutexGuard<()>>,
    staged: Vec<Staged>,
}

impl MemoryReactionTransaction {
    pub(super) fn new(inner: Arc<Inner>) -> Self {
        Self {
            inner,
            guards: Vec::new(),
            staged: Vec::new(),
        }
    }

    fn staged_reaction(&self, user_id: Snowflake, comment_id: Snowflake) -> Option<Option<CommentReaction>> {
        self.staged.iter().rev().find_map(|op| match op {
            Staged::Put(r) if r.user_id == user_id && r.comment_id == comment_id => Some(Some(r.clone())),
            Staged::Remove { user_id: u, comment_id: c } if *u == user_id && *c == comment_id => Some(None),
            _ => None,
        })
    }
}

#[async_trait]
impl ReactionTransaction for MemoryReactionTransaction {
    async fn lock_comment(&mut self, comment_id: Snowflake) -> RepoResult<Option<Comment>> {
        // No lock entry for ids that were never comments
        if !self.inner.tables.read().comments.contains_key(&comment_id) {
            return Ok(None);
        }
        let guard = self.inner.comment_lock(comment_id).lock_owned().await;
        self.guards.push(guard);
        Ok(self.inner.tables.read().comments.get(&comment_id).cloned())
    }

    async fn find(&mut self, user_id: Snowflake, comment_id: Snowflake) -> RepoResult<Option<CommentReaction>> {
        if let Some(staged) = self.staged_reaction(user_id, comment_id) {
            return Ok(staged);
        }
        Ok(self
            .inner
            .tables
            .read()
            .reactions
            .get(&(user_id, comment_id))
            .cloned())
    }

    async fn create(&mut self, reaction: &CommentReaction) -> RepoResult<()> {
        if self.find(reaction.user_id, reaction.comment_id).await?.is_some() {
            return Err(DomainError::ReactionAlreadyExists);
        }
        self.staged.push(Staged::Put(reaction.clone()));
        Ok(())
    }

    async fn update(&mut self, reaction: &CommentReaction) -> RepoResult<()> {
        if self.find(reaction.user_id, reaction.comment_id).await?.is_none() {
            return Err(DomainError::InternalError(format!(
                "reaction {} vanished during update",
                reaction.id
            )));
        }
        self.staged.push(Staged::Put(reaction.clone()));
        Ok(())
    }

    async fn delete(&mut self, reaction: &CommentReaction) -> RepoResult<()> {
        self.staged.push(Staged::Remove {
            user_id: reaction.user_id,
            comment_id: reaction.comment_id,
        });
        Ok(())
    }

    async fn save_counters(&mut self, comment: &Comment) -> RepoResult<()> {
        self.staged.push(Staged::Counters {
            comment_id: comment.id,
            likes: comment.likes,
            dislikes: comment.dislikes,
        });
        Ok(())
    }

    async fn commit(self: Box<Self>) -> RepoResult<()> {
        // The comment guards in `this.guards` are released after the tables
        let this = *self;
        let mut tables = this.inner.tables.write();

        // Everything the staged writes reference must still exist,
        // otherwise nothing is applied.
        for op in &this.staged {
            match op {
                Staged::Put(r) => {
                    if !tables.comments.contains_key(&r.comment_id) {
                        return Err(DomainError::CommentNotFound(r.comment_id));
                    }
                    if !tables.users.contains_key(&r.user_id) {
                        return Err(DomainError::UserNotFound(r.user_id));
                    }
                }
                Staged::Counters { comment_id, .. } => {
                    if !tables.comments.contains_key(comment_id) {
                        return Err(DomainError::CommentNotFound(*comment_id));
                    }
                }
                Staged::Remove { .. } => {}
            }
        }

        for op in this.staged {
            match op {
                Staged::Put(r) => {
                    tables.reactions.insert((r.user_id, r.comment_id), r);
                }
                Staged::Remove { user_id, comment_id } => {
                    tables.reactions.remove(&(user_id, comment_id));
                }
                Staged::Counters {
                    comment_id,
                    likes,
                    dislikes,
                } => {
                    if let Some(comment) = tables.comments.get_mut(&comment_id) {
                        comment.likes = likes.max(0);
                        comment.dislikes = dislikes.max(0);
                    }
                }
            }
        }
        Ok(())
    }
}
