use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_models::auth::{Role, User};
use shared_models::error::AppError;

pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn to_user(&self) -> User {
        User {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
            created_at: Some(self.created_at),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub token: String,
    pub expires_in_hours: i64,
    pub user: User,
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("An account with email {0} already exists")]
    EmailTaken(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Account not found")]
    NotFound,

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Session could not be issued: {0}")]
    Session(String),

    #[error("Account store unavailable: {0}")]
    Store(String),
}

impl From<AuthError> for AppError {
    fn from(error: AuthError) -> Self {
        let message = error.to_string();
        match error {
            AuthError::InvalidCredentials => AppError::Auth(message),
            AuthError::EmailTaken(_) => AppError::Conflict(message),
            AuthError::InvalidInput(_) => AppError::ValidationError(message),
            AuthError::NotFound => AppError::NotFound(message),
            AuthError::PasswordHash(_) | AuthError::Session(_) | AuthError::Store(_) => {
                AppError::Internal(message)
            }
        }
    }
}
