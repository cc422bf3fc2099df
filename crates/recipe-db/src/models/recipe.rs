//! Recipe database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct RecipeModel {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub time_in_mins: i32,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub servings: i32,
    pub rating: f64,
    pub cuisine: Option<String>,
    pub meal_type: Option<String>,
    pub diet: Option<String>,
    pub main_ingredient: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Aggregate row for moderation counts
#[derive(Debug, Clone, Copy, FromRow)]
pub struct RecipeStatsModel {
    pub total: i64,
    pub published: i64,
}
