//! Signed-in user and authentication payloads

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Role;
use crate::types::Id;
use crate::validation::validate_phone_digits;

/// The account behind the current session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Id,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct LoginCredentials {
    #[validate(email(code = "email"))]
    pub email: String,
    #[validate(length(min = 1, code = "required"))]
    pub password: String,
}

/// Self-registration form. The confirmation never leaves the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterData {
    #[validate(length(min = 3, code = "too_short"))]
    pub username: String,
    #[validate(length(min = 3, code = "too_short"))]
    pub full_name: String,
    #[validate(email(code = "email"))]
    pub email: String,
    #[validate(custom = "validate_phone_digits")]
    pub phone_number: String,
    #[validate(length(min = 6, code = "too_short"))]
    pub password: String,
    #[serde(skip_serializing, default)]
    #[validate(must_match = "password")]
    pub confirm_password: String,
}

/// Body of a successful `POST /auth/login`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}
