//! # recipe-service
//!
//! Application layer containing business logic, services, and DTOs.
//! The comment reaction reconciler and the comment listing assembler
//! live in [`services::reaction`] and [`services::comment`].

pub mod dto;
pub mod services;

pub use dto::*;
pub use services::*;
