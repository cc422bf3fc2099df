//! User entity - a registered account

use chrono::{DateTime, Utc};

use crate::value_objects::{Snowflake, UserRole};

/// Names taken by fixed `/users/...` paths; a profile at any of them would be unreachable
pub const RESERVED_USERNAMES: &[&str] = &[
    "profile",
    "change-password",
    "delete-account",
    "my-recipes",
    "saved-recipes",
    "recipe",
    "save-recipe",
    "unsave-recipe",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    pub role: UserRole,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether `username` shadows a fixed route, ignoring case
    pub fn is_reserved_username(username: &str) -> bool {
        RESERVED_USERNAMES.iter().any(|r| r.eq_ignore_ascii_case(username))
    }

    /// Create an active account with the `User` role
    pub fn new(id: Snowflake, username: String, email: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            username,
            email,
            bio: None,
            role: UserRole::User,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn set_username(&mut self, username: String) {
        self.username = username;
        self.updated_at = Utc::now();
    }

    pub fn set_email(&mut self, email: String) {
        self.email = email;
        self.updated_at = Utc::now();
    }

    /// Blank bios are stored as absent
    pub fn set_bio(&mut self, bio: Option<String>) {
        self.bio = bio.filter(|b| !b.trim().is_empty());
        self.updated_at = Utc::now();
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        self.updated_at = Utc::now();
    }
}
