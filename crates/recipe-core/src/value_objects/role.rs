//! Account roles

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }

    /// Unknown values fall back to `User`
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("ADMIN") {
            Self::Admin
        } else {
            Self::User
        }
    }

    #[inline]
    pub fn is_admin(self) -> bool {
        self == Self::Admin
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
