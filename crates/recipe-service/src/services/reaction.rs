//! Comment reaction reconciler
//!
//! The only code path that writes a comment's `likes`/`dislikes`. Each call
//! runs in one unit of work from the reaction store:
//!
//! 1. lock the comment row (NotFound if it does not exist)
//! 2. resolve the user (NotFound if it does not exist)
//! 3. read the pair's current reaction and apply the intent to the state
//!    machine in [`ReactionState::react`]
//! 4. stage the store mutation and the new counters, then commit both at once
//!
//! The comment lock serializes every reconciliation on that comment, so the
//! read in step 3 cannot go stale before the commit. Any error before commit
//! drops the unit of work and nothing is applied.

use recipe_core::entities::{Comment, CommentReaction};
use recipe_core::{ReactionKind, ReactionState, ReactionTransition, Snowflake, StoreMutation};
use tracing::{debug, info, instrument};

use crate::dto::CommentView;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Result of a reconciliation
#[derive(Debug, Clone)]
pub struct ReactionOutcome {
    /// The comment with its committed counters
    pub comment: Comment,
    pub transition: ReactionTransition,
}

impl ReactionOutcome {
    /// The caller's state after the reaction
    pub fn state(&self) -> ReactionState {
        self.transition.to
    }
}

/// Reaction service
pub struct ReactionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReactionService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Apply `intent` from `user_id` to `comment_id`
    #[instrument(skip(self))]
    pub async fn react(
        &self,
        comment_id: Snowflake,
        user_id: Snowflake,
        intent: ReactionKind,
    ) -> ServiceResult<ReactionOutcome> {
        let mut tx = self.ctx.reaction_repo().begin().await?;

        let mut comment = tx
            .lock_comment(comment_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Comment", comment_id.to_string()))?;

        if self.ctx.user_repo().find_by_id(user_id).await?.is_none() {
            return Err(ServiceError::not_found("User", user_id.to_string()));
        }

        let existing = tx.find(user_id, comment_id).await?;
        let transition = ReactionState::from_kind(existing.as_ref().map(|r| r.kind)).react(intent);

        match (transition.mutation, existing) {
            (StoreMutation::Create(kind), None) => {
                let reaction = CommentReaction::new(self.ctx.generate_id(), user_id, comment_id, kind);
                tx.create(&reaction).await?;
            }
            (StoreMutation::Update(kind), Some(mut reaction)) => {
                reaction.kind = kind;
                tx.update(&reaction).await?;
            }
            (StoreMutation::Delete, Some(reaction)) => {
                tx.delete(&reaction).await?;
            }
            (mutation, found) => {
                return Err(ServiceError::internal(format!(
                    "reaction state out of sync: {mutation:?} with stored {found:?}"
                )));
            }
        }

        comment.apply_delta(transition.delta);
        tx.save_counters(&comment).await?;
        tx.commit().await?;

        debug!(from = ?transition.from, to = ?transition.to, "Reaction transition applied");
        info!(
            comment_id = %comment_id,
            user_id = %user_id,
            likes = comment.likes,
            dislikes = comment.dislikes,
            "Reaction reconciled"
        );

        Ok(ReactionOutcome { comment, transition })
    }

    /// Like, or take back a like
    pub async fn react_like(&self, comment_id: Snowflake, user_id: Snowflake) -> ServiceResult<CommentView> {
        self.react_view(comment_id, user_id, ReactionKind::Like).await
    }

    /// Dislike, or take back a dislike
    pub async fn react_dislike(&self, comment_id: Snowflake, user_id: Snowflake) -> ServiceResult<CommentView> {
        self.react_view(comment_id, user_id, ReactionKind::Dislike).await
    }

    async fn react_view(
        &self,
        comment_id: Snowflake,
        user_id: Snowflake,
        intent: ReactionKind,
    ) -> ServiceResult<CommentView> {
        let outcome = self.react(comment_id, user_id, intent).await?;

        let author = self
            .ctx
            .user_repo()
            .find_by_id(outcome.comment.author_id)
            .await?
            .map(|u| u.username)
            .unwrap_or_default();

        Ok(CommentView::assemble(
            &outcome.comment,
            &author,
            outcome.state(),
            chrono::Utc::now(),
        ))
    }
}
