//! Path parameters
//!
//! Ids travel as strings in URLs; each struct parses its id on demand so
//! a malformed id becomes a 400 naming the parameter.

use recipe_core::Snowflake;
use serde::Deserialize;

use crate::response::ApiError;

fn parse_id(raw: &str, name: &str) -> Result<Snowflake, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::invalid_path(format!("Invalid {name} format")))
}

#[derive(Debug, Deserialize)]
pub struct RecipeIdPath {
    pub recipe_id: String,
}

impl RecipeIdPath {
    pub fn recipe_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.recipe_id, "recipe_id")
    }
}

#[derive(Debug, Deserialize)]
pub struct CommentIdPath {
    pub comment_id: String,
}

impl CommentIdPath {
    pub fn comment_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.comment_id, "comment_id")
    }
}

#[derive(Debug, Deserialize)]
pub struct UserIdPath {
    pub user_id: String,
}

impl UserIdPath {
    pub fn user_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.user_id, "user_id")
    }
}

#[derive(Debug, Deserialize)]
pub struct UsernamePath {
    pub username: String,
}
