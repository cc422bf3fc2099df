//! User database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Row of the `users` table, without the password hash
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    pub role: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
