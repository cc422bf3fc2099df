//! Comment reaction - one user's like or dislike on one comment

use crate::value_objects::{ReactionKind, Snowflake};

/// At most one exists per (user_id, comment_id)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentReaction {
    pub id: Snowflake,
    pub user_id: Snowflake,
    pub comment_id: Snowflake,
    pub kind: ReactionKind,
}

impl CommentReaction {
    pub fn new(id: Snowflake, user_id: Snowflake, comment_id: Snowflake, kind: ReactionKind) -> Self {
        Self {
            id,
            user_id,
            comment_id,
            kind,
        }
    }
}
