//! Comment database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct CommentModel {
    pub id: i64,
    pub recipe_id: i64,
    pub author_id: i64,
    pub text: String,
    pub likes: i32,
    pub dislikes: i32,
    pub rating: f64,
    pub reported: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
