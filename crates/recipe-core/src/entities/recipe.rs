//! Recipe entity and its query types

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// A published or pending recipe
///
/// New recipes start inactive with a zero rating; an administrator
/// publishes them by setting `active`.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub id: Snowflake,
    pub owner_id: Snowflake,
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

impl Recipe {
    pub fn new(id: Snowflake, owner_id: Snowflake, title: String, time_in_mins: i32, servings: i32) -> Self {
        let now = Utc::now();
        Self {
            id,
            owner_id,
            title,
            description: None,
            time_in_mins,
            prep_time: None,
            cook_time: None,
            servings,
            rating: 0.0,
            cuisine: None,
            meal_type: None,
            diet: None,
            main_ingredient: None,
            ingredients: Vec::new(),
            instructions: Vec::new(),
            active: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_owner(&self, user_id: Snowflake) -> bool {
        self.owner_id == user_id
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Check the recipe against every criterion set on `filter`
    pub fn matches(&self, filter: &RecipeFilter) -> bool {
        fn same(value: Option<&String>, wanted: Option<&String>) -> bool {
            match wanted {
                None => true,
                Some(w) => value.is_some_and(|v| v.eq_ignore_ascii_case(w)),
            }
        }

        filter
            .title
            .as_ref()
            .is_none_or(|t| self.title.to_lowercase().contains(&t.to_lowercase()))
            && filter.min_rating.is_none_or(|r| self.rating >= r)
            && filter.max_cooking_time.is_none_or(|m| self.time_in_mins <= m)
            && filter.servings.is_none_or(|s| self.servings == s)
            && same(self.cuisine.as_ref(), filter.cuisine.as_ref())
            && same(self.meal_type.as_ref(), filter.meal_type.as_ref())
            && same(self.diet.as_ref(), filter.diet.as_ref())
            && same(self.main_ingredient.as_ref(), filter.main_ingredient.as_ref())
    }
}

/// Search criteria; unset fields match everything, set fields combine with AND
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeFilter {
    pub title: Option<String>,
    pub cuisine: Option<String>,
    pub meal_type: Option<String>,
    pub diet: Option<String>,
    pub main_ingredient: Option<String>,
    pub min_rating: Option<f64>,
    pub max_cooking_time: Option<i32>,
    pub servings: Option<i32>,
}

impl RecipeFilter {
    /// Treat blank text criteria as unset
    pub fn normalized(mut self) -> Self {
        for field in [
            &mut self.title,
            &mut self.cuisine,
            &mut self.meal_type,
            &mut self.diet,
            &mut self.main_ingredient,
        ] {
            *field = field
                .take()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty());
        }
        self
    }
}

/// Moderation counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecipeStats {
    pub total: i64,
    pub published: i64,
    pub pending: i64,
}
