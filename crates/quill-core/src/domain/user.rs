use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{PASSWORD_MIN, USERNAME_MAX, USERNAME_MIN, Validator};
use crate::error::DomainError;

/// Authorization role carried by every user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// User entity - represents a user in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            role: Role::User,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Sign-up input, validated before the password is hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), DomainError> {
        let username = self.username.trim();
        let email = self.email.trim();
        Validator::new()
            .length(
                "username",
                username,
                USERNAME_MIN,
                USERNAME_MAX,
                "Username must be between 3 and 30 characters",
            )
            .check(
                username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'),
                "username",
                "Username can only contain letters, numbers, and underscores",
            )
            .check(
                is_plausible_email(email),
                "email",
                "Please provide a valid email",
            )
            .check(
                self.password.chars().count() >= PASSWORD_MIN,
                "password",
                "Password must be at least 6 characters long",
            )
            .finish()
    }

    /// Trimmed username and lowercased email, ready to store.
    pub fn into_user(self, password_hash: String) -> User {
        User::new(
            self.username.trim().to_string(),
            self.email.trim().to_lowercase(),
            password_hash,
        )
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}
