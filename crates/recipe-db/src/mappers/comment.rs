//! Comment model -> entity

use recipe_core::entities::Comment;
use recipe_core::value_objects::Snowflake;

use crate::models::CommentModel;

impl From<CommentModel> for Comment {
    fn from(model: CommentModel) -> Self {
        Comment {
            id: Snowflake::new(model.id),
            recipe_id: Snowflake::new(model.recipe_id),
            author_id: Snowflake::new(model.author_id),
            text: model.text,
            likes: model.likes,
            dislikes: model.dislikes,
            rating: model.rating,
            reported: model.reported,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
