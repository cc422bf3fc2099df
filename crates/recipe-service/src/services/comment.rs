//! Comment service
//!
//! Listing assembly plus comment create/edit/delete/report. Counters are
//! never written here; see [`super::reaction`].

use std::collections::HashMap;

use chrono::Utc;
use recipe_core::entities::Comment;
use recipe_core::{ReactionState, Snowflake};
use tracing::{info, instrument};

use crate::dto::{CommentTextRequest, CommentView};

use super::access::AccessService;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Comment service
pub struct CommentService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CommentService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Comments on a recipe, oldest first, as seen by `viewer_id`
    ///
    /// Without a viewer every `user_liked`/`user_disliked` flag is false.
    /// With one, the viewer's reactions for exactly these comments are
    /// fetched in a single bulk call.
    #[instrument(skip(self))]
    pub async fn list_comments(
        &self,
        recipe_id: Snowflake,
        viewer_id: Option<Snowflake>,
    ) -> ServiceResult<Vec<CommentView>> {
        if self.ctx.recipe_repo().find_by_id(recipe_id).await?.is_none() {
            return Err(ServiceError::not_found("Recipe", recipe_id.to_string()));
        }
        if let Some(viewer_id) = viewer_id {
            if self.ctx.user_repo().find_by_id(viewer_id).await?.is_none() {
                return Err(ServiceError::not_found("User", viewer_id.to_string()));
            }
        }

        let comments = self.ctx.comment_repo().find_by_recipe(recipe_id).await?;
        if comments.is_empty() {
            return Ok(Vec::new());
        }

        let comment_ids: Vec<Snowflake> = comments.iter().map(|c| c.id).collect();
        let reactions = match viewer_id {
            Some(viewer_id) => {
                self.ctx
                    .reaction_repo()
                    .find_bulk(viewer_id, &comment_ids)
                    .await?
            }
            None => HashMap::new(),
        };

        let authors = self.author_names(&comments).await?;
        let now = Utc::now();

        Ok(comments
            .iter()
            .map(|comment| {
                let state = ReactionState::from_kind(reactions.get(&comment.id).map(|r| r.kind));
                let author = authors.get(&comment.author_id).map_or("", String::as_str);
                CommentView::assemble(comment, author, state, now)
            })
            .collect())
    }

    /// Add a comment to a recipe
    #[instrument(skip(self, request))]
    pub async fn add_comment(
        &self,
        recipe_id: Snowflake,
        author_id: Snowflake,
        request: CommentTextRequest,
    ) -> ServiceResult<CommentView> {
        let author = AccessService::new(self.ctx).require_actor(author_id).await?;

        if self.ctx.recipe_repo().find_by_id(recipe_id).await?.is_none() {
            return Err(ServiceError::not_found("Recipe", recipe_id.to_string()));
        }

        let text = request.text.trim().to_string();
        if text.is_empty() {
            return Err(ServiceError::validation("Comment text cannot be blank"));
        }

        let comment = Comment::new(self.ctx.generate_id(), recipe_id, author_id, text);
        self.ctx.comment_repo().create(&comment).await?;

        info!(comment_id = %comment.id, recipe_id = %recipe_id, "Comment added");

        Ok(CommentView::assemble(&comment, &author.username, ReactionState::None, Utc::now()))
    }

    /// Edit a comment's text (author or ADMIN)
    #[instrument(skip(self, request))]
    pub async fn update_comment(
        &self,
        comment_id: Snowflake,
        actor_id: Snowflake,
        request: CommentTextRequest,
    ) -> ServiceResult<CommentView> {
        let access = AccessService::new(self.ctx);
        let actor = access.require_actor(actor_id).await?;
        let mut comment = self.find_comment(comment_id).await?;
        access.ensure_comment_editor(&actor, &comment)?;

        let text = request.text.trim().to_string();
        if text.is_empty() {
            return Err(ServiceError::validation("Comment text cannot be blank"));
        }
        comment.set_text(text);
        self.ctx.comment_repo().update_text(&comment).await?;

        info!(comment_id = %comment_id, "Comment updated");

        let state = ReactionState::from_kind(
            self.ctx
                .reaction_repo()
                .find(actor_id, comment_id)
                .await?
                .map(|r| r.kind),
        );
        let author = self.author_names(std::slice::from_ref(&comment)).await?;
        let author = author.get(&comment.author_id).map_or("", String::as_str);
        Ok(CommentView::assemble(&comment, author, state, Utc::now()))
    }

    /// Delete a comment (author, recipe owner or ADMIN); its reactions go with it
    #[instrument(skip(self))]
    pub async fn delete_comment(&self, comment_id: Snowflake, actor_id: Snowflake) -> ServiceResult<()> {
        let access = AccessService::new(self.ctx);
        let actor = access.require_actor(actor_id).await?;
        let comment = self.find_comment(comment_id).await?;
        access.ensure_comment_remover(&actor, &comment).await?;

        self.ctx.comment_repo().delete(comment_id).await?;

        info!(comment_id = %comment_id, actor_id = %actor_id, "Comment deleted");
        Ok(())
    }

    /// Flag a comment for moderation; reporting twice is harmless
    #[instrument(skip(self))]
    pub async fn report_comment(&self, comment_id: Snowflake, reporter_id: Snowflake) -> ServiceResult<()> {
        AccessService::new(self.ctx).require_actor(reporter_id).await?;
        let comment = self.find_comment(comment_id).await?;

        if !comment.reported {
            self.ctx.comment_repo().set_reported(comment_id, true).await?;
            info!(comment_id = %comment_id, reporter_id = %reporter_id, "Comment reported");
        }
        Ok(())
    }

    async fn find_comment(&self, comment_id: Snowflake) -> ServiceResult<Comment> {
        self.ctx
            .comment_repo()
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Comment", comment_id.to_string()))
    }

    async fn author_names(&self, comments: &[Comment]) -> ServiceResult<HashMap<Snowflake, String>> {
        let ids: Vec<Snowflake> = comments.iter().map(|c| c.author_id).collect();
        Ok(self
            .ctx
            .user_repo()
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use recipe_core::traits::CommentRepository;
    use recipe_core::ReactionKind;

    use super::*;
    use crate::services::reaction::ReactionService;
    use crate::services::test_support::Fixture;

    fn text(s: &str) -> CommentTextRequest {
        CommentTextRequest { text: s.to_string() }
    }

    #[tokio::test]
    async fn test_anonymous_listing_has_no_flags() {
        let fx = Fixture::new();
        let author = fx.user("author").await;
        let recipe = fx.recipe(&author, "Soup").await;
        let a = fx.comment(&recipe, &author, "first").await;
        fx.comment(&recipe, &author, "second").await;
        ReactionService::new(&fx.ctx)
            .react(a.id, author.id, ReactionKind::Like)
            .await
            .unwrap();

        let views = CommentService::new(&fx.ctx).list_comments(recipe.id, None).await.unwrap();
        assert_eq!(views.len(), 2);
        assert!(views.iter().all(|v| !v.user_liked && !v.user_disliked));
        assert_eq!(views[0].likes, 1);
    }

    #[tokio::test]
    async fn test_viewer_flags_only_on_reacted_comment() {
        let fx = Fixture::new();
        let author = fx.user("author").await;
        let viewer = fx.user("viewer").await;
        let recipe = fx.recipe(&author, "Soup").await;
        let x = fx.comment(&recipe, &author, "x").await;
        let y = fx.comment(&recipe, &author, "y").await;
        let reactions = ReactionService::new(&fx.ctx);
        reactions.react(x.id, viewer.id, ReactionKind::Like).await.unwrap();
        // Someone else's dislike on y must not leak into the viewer's flags
        reactions.react(y.id, author.id, ReactionKind::Dislike).await.unwrap();

        let views = CommentService::new(&fx.ctx)
            .list_comments(recipe.id, Some(viewer.id))
            .await
            .unwrap();
        let by_id: HashMap<String, &CommentView> = views.iter().map(|v| (v.id.clone(), v)).collect();

        let vx = by_id[&x.id.to_string()];
        assert!(vx.user_liked && !vx.user_disliked);
        let vy = by_id[&y.id.to_string()];
        assert!(!vy.user_liked && !vy.user_disliked);
        assert_eq!(vy.dislikes, 1);
    }

    #[tokio::test]
    async fn test_listing_order_and_relative_time() {
        let fx = Fixture::new();
        let author = fx.user("author").await;
        let recipe = fx.recipe(&author, "Soup").await;

        let now = Utc::now();
        for (text, ago) in [
            ("day", Duration::hours(25)),
            ("minutes", Duration::minutes(45)),
            ("fresh", Duration::seconds(90)),
        ] {
            let mut comment = Comment::new(fx.ctx.generate_id(), recipe.id, author.id, text.into());
            comment.created_at = now - ago;
            CommentRepository::create(&fx.store, &comment).await.unwrap();
        }

        let views = CommentService::new(&fx.ctx).list_comments(recipe.id, None).await.unwrap();
        let rendered: Vec<(&str, &str)> = views.iter().map(|v| (v.text.as_str(), v.time.as_str())).collect();
        assert_eq!(
            rendered,
            vec![
                ("day", "1 day ago"),
                ("minutes", "45 minutes ago"),
                ("fresh", "1 minute ago"),
            ]
        );
        assert!(views.iter().all(|v| v.author == "author"));
    }

    #[tokio::test]
    async fn test_listing_unknown_recipe_or_viewer() {
        let fx = Fixture::new();
        let author = fx.user("author").await;
        let recipe = fx.recipe(&author, "Soup").await;
        let service = CommentService::new(&fx.ctx);

        assert!(service.list_comments(Snowflake::new(1), None).await.unwrap_err().is_not_found());
        assert!(service
            .list_comments(recipe.id, Some(Snowflake::new(1)))
            .await
            .unwrap_err()
            .is_not_found());
        assert!(service.list_comments(recipe.id, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_and_edit_comment() {
        let fx = Fixture::new();
        let author = fx.user("author").await;
        let other = fx.user("other").await;
        let admin = fx.admin("admin").await;
        let recipe = fx.recipe(&author, "Soup").await;
        let service = CommentService::new(&fx.ctx);

        let view = service.add_comment(recipe.id, author.id, text("  tasty ")).await.unwrap();
        assert_eq!(view.text, "tasty");
        assert_eq!((view.likes, view.dislikes), (0, 0));
        assert_eq!(view.time, "just now");
        let id: Snowflake = view.id.parse().unwrap();

        let err = service.update_comment(id, other.id, text("mine now")).await.unwrap_err();
        assert_eq!(err.status_code(), 403);

        let edited = service.update_comment(id, admin.id, text("moderated")).await.unwrap();
        assert_eq!(edited.text, "moderated");
        assert_eq!(edited.author, "author");

        assert!(service.add_comment(recipe.id, author.id, text("   ")).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_rights() {
        let fx = Fixture::new();
        let owner = fx.user("owner").await;
        let author = fx.user("author").await;
        let stranger = fx.user("stranger").await;
        let recipe = fx.recipe(&owner, "Soup").await;
        let service = CommentService::new(&fx.ctx);

        let by_author = fx.comment(&recipe, &author, "a").await;
        let err = service.delete_comment(by_author.id, stranger.id).await.unwrap_err();
        assert_eq!(err.status_code(), 403);

        // Recipe owner can remove comments on their recipe
        service.delete_comment(by_author.id, owner.id).await.unwrap();
        assert!(service
            .delete_comment(by_author.id, owner.id)
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn test_report_is_idempotent() {
        let fx = Fixture::new();
        let author = fx.user("author").await;
        let reader = fx.user("reader").await;
        let recipe = fx.recipe(&author, "Soup").await;
        let comment = fx.comment(&recipe, &author, "rude").await;
        let service = CommentService::new(&fx.ctx);

        service.report_comment(comment.id, reader.id).await.unwrap();
        service.report_comment(comment.id, reader.id).await.unwrap();
        assert!(fx.stored_comment(&comment).await.reported);
    }
}
