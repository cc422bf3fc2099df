//! Recipe model -> entity

use recipe_core::entities::{Recipe, RecipeStats};
use recipe_core::value_objects::Snowflake;

use crate::models::{RecipeModel, RecipeStatsModel};

impl From<RecipeModel> for Recipe {
    fn from(model: RecipeModel) -> Self {
        Recipe {
            id: Snowflake::new(model.id),
            owner_id: Snowflake::new(model.owner_id),
            title: model.title,
            description: model.description,
            time_in_mins: model.time_in_mins,
            prep_time: model.prep_time,
            cook_time: model.cook_time,
            servings: model.servings,
            rating: model.rating,
            cuisine: model.cuisine,
            meal_type: model.meal_type,
            diet: model.diet,
            main_ingredient: model.main_ingredient,
            ingredients: model.ingredients,
            instructions: model.instructions,
            active: model.active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<RecipeStatsModel> for RecipeStats {
    fn from(model: RecipeStatsModel) -> Self {
        RecipeStats {
            total: model.total,
            published: model.published,
            pending: model.total - model.published,
        }
    }
}
