//! User entity definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A user account as stored in the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub role: UserRole,
    pub sub: String,
    pub name: Option<String>,
    pub avatar_id: Option<String>,
    /// Set to a timestamp once the account is soft-deleted.
    pub deleted: Option<String>,
}

impl User {
    pub fn is_deleted(&self) -> bool {
        self.deleted.as_deref().is_some_and(|marker| !marker.is_empty())
    }
}

/// User role enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown user role `{0}`")]
pub struct UnknownRole(pub String);

impl FromStr for UserRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(UserRole::User),
            "admin" => Ok(UserRole::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
