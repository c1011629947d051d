// models/src/medical/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{ValidationError, ValidationResult};

// --- DTO for New User Registration ---
// Holds the plaintext password only until the security layer hashes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub phone: String,
    pub full_name: String,
    pub age: i32,
    pub gender: String,
    pub password: String,
}

impl NewUser {
    pub fn validate(&self) -> ValidationResult<()> {
        let email = self.email.trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
            _ => return Err(ValidationError::InvalidEmail(self.email.clone())),
        }
        if self.password.is_empty() {
            return Err(ValidationError::EmptyField("password"));
        }
        if self.full_name.trim().is_empty() {
            return Err(ValidationError::EmptyField("full_name"));
        }
        if self.age < 0 {
            return Err(ValidationError::InvalidAge(self.age));
        }
        Ok(())
    }
}

// --- Stored User Struct ---
// Carries the password hash, never the plaintext password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub email: String,
    pub phone: String,
    pub full_name: String,
    pub age: i32,
    pub gender: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            email: self.email.clone(),
            phone: self.phone.clone(),
            full_name: self.full_name.clone(),
            age: self.age,
            gender: self.gender.clone(),
        }
    }
}

/// Public view of a user returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    pub email: String,
    pub phone: String,
    pub full_name: String,
    pub age: i32,
    pub gender: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Login {
    pub email: String,
    pub password: String,
}
