//! Comment reaction database model

use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct CommentReactionModel {
    pub id: i64,
    pub user_id: i64,
    pub comment_id: i64,
    pub kind: String,
}
