//! Comment entity - a user's comment on a recipe
//!
//! `likes` and `dislikes` are denormalized counters of the reactions that
//! reference the comment. They only change through the reaction
//! reconciler, and never drop below zero.

use chrono::{DateTime, Utc};

use crate::value_objects::{CounterDelta, Snowflake};

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: Snowflake,
    pub recipe_id: Snowflake,
    pub author_id: Snowflake,
    pub text: String,
    pub likes: i32,
    pub dislikes: i32,
    pub rating: f64,
    pub reported: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(id: Snowflake, recipe_id: Snowflake, author_id: Snowflake, text: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            recipe_id,
            author_id,
            text,
            likes: 0,
            dislikes: 0,
            rating: 0.0,
            reported: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_author(&self, user_id: Snowflake) -> bool {
        self.author_id == user_id
    }

    pub fn set_text(&mut self, text: String) {
        self.text = text;
        self.updated_at = Utc::now();
    }

    pub fn increment_likes(&mut self) {
        self.likes = self.likes.saturating_add(1);
    }

    pub fn decrement_likes(&mut self) {
        self.likes = (self.likes - 1).max(0);
    }

    pub fn increment_dislikes(&mut self) {
        self.dislikes = self.dislikes.saturating_add(1);
    }

    pub fn decrement_dislikes(&mut self) {
        self.dislikes = (self.dislikes - 1).max(0);
    }

    /// Apply a reconciler delta through the single-step counter mutations
    pub fn apply_delta(&mut self, delta: CounterDelta) {
        match delta.likes.signum() {
            1 => self.increment_likes(),
            -1 => self.decrement_likes(),
            _ => {}
        }
        match delta.dislikes.signum() {
            1 => self.increment_dislikes(),
            -1 => self.decrement_dislikes(),
            _ => {}
        }
    }
}
