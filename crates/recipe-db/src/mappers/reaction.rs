//! Comment reaction model -> entity

use recipe_core::entities::CommentReaction;
use recipe_core::error::DomainError;
use recipe_core::value_objects::{ReactionKind, Snowflake};

use crate::models::CommentReactionModel;

impl TryFrom<CommentReactionModel> for CommentReaction {
    type Error = DomainError;

    fn try_from(model: CommentReactionModel) -> Result<Self, Self::Error> {
        let kind = ReactionKind::parse(&model.kind).ok_or_else(|| {
            DomainError::DatabaseError(format!("unknown reaction kind '{}'", model.kind))
        })?;

        Ok(CommentReaction {
            id: Snowflake::new(model.id),
            user_id: Snowflake::new(model.user_id),
            comment_id: Snowflake::new(model.comment_id),
            kind,
        })
    }
}
