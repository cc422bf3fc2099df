//! Integration test utilities for the recipe API
//!
//! Spawns the real server in-process on a PostgreSQL database and talks to
//! it over HTTP.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
