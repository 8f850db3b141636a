//! Request types for the accounts handlers and their validation rules.

use serde::{Deserialize, Serialize};

use crate::utils::validation::{Constraint, Rule, Validate};

const EMAIL_RULES: &[Rule] = &[Rule::Required, Rule::MaxLen(100), Rule::Email];
const SUB_RULES: &[Rule] = &[Rule::Required, Rule::MaxLen(100)];

/// Establish identity for an email, creating the account on first sight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthRequest {
    pub email: String,
    pub sub: String,
}

impl Validate for AuthRequest {
    const REJECTION: &'static str = "Invalid email or code";

    fn constraints(&self) -> Vec<Constraint<'_>> {
        vec![
            ("email", self.email.as_str(), EMAIL_RULES),
            ("sub", self.sub.as_str(), SUB_RULES),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIds {
    pub user_ids: Vec<String>,
}

impl Validate for UserIds {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserId {
    pub user_id: String,
}

impl Validate for UserId {}

/// Profile edit. Only name and avatar are ever written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_id: Option<String>,
}

impl Validate for UpdateUserRequest {}

/// Soft delete, gated on the caller knowing id, sub and email together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteUserRequest {
    pub id: String,
    pub sub: String,
    pub email: String,
}

impl Validate for DeleteUserRequest {}
