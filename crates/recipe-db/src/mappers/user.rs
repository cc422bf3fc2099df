//! User model -> entity

use recipe_core::entities::User;
use recipe_core::value_objects::{Snowflake, UserRole};

use crate::models::UserModel;

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: Snowflake::new(model.id),
            username: model.username,
            email: model.email,
            bio: model.bio,
            role: UserRole::parse(&model.role),
            active: model.active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
