//! User model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::roles;

/// Application user, keyed by the identity provider's user id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub photo_url: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_techtronica: bool,
    #[serde(default)]
    pub is_banned: bool,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub joined_at: DateTime<Utc>,
}

/// Role flags an admin can toggle on a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Techtronica,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => roles::ADMIN,
            Self::Techtronica => roles::TECHTRONICA,
        }
    }

    /// Name of the boolean field this role maps to on the user document
    pub fn flag_field(&self) -> &'static str {
        match self {
            Self::Admin => "isAdmin",
            Self::Techtronica => "isTechtronica",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl User {
    /// Check if the user holds a role
    pub fn has_role(&self, role: Role) -> bool {
        match role {
            Role::Admin => self.is_admin,
            Role::Techtronica => self.is_techtronica,
        }
    }
}
