//! Route handlers, one module per resource

pub mod admin;
pub mod auth;
pub mod comments;
pub mod health;
pub mod recipes;
pub mod users;
