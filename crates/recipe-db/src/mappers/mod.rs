//! Model to entity mappers
//!
//! `From<Model> for Entity` conversions for rows read from PostgreSQL.

mod comment;
mod reaction;
mod recipe;
mod user;
