use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use auth_cell::{AuthError, SessionResponse};
use shared_models::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
    pub phone: String,
    pub medical_history: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Patient {
    pub fn age_on(&self, today: NaiveDate) -> u32 {
        today.years_since(self.date_of_birth).unwrap_or(0)
    }

    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.name.to_lowercase().contains(&term)
            || self.email.to_lowercase().contains(&term)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterPatientRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub date_of_birth: String,
    pub phone: String,
    pub medical_history: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientSearchQuery {
    pub search: Option<String>,
}

/// Returned by self-registration: the new profile plus a ready-to-use session.
#[derive(Debug, Clone, Serialize)]
pub struct PatientRegistration {
    pub patient: Patient,
    pub session: SessionResponse,
}

#[derive(Error, Debug)]
pub enum PatientError {
    #[error("Patient not found")]
    NotFound,

    #[error("Invalid date of birth: {0}")]
    InvalidDateOfBirth(String),

    #[error("Unauthorized access to patient data")]
    Unauthorized,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Account(#[from] AuthError),

    #[error("Patient store unavailable: {0}")]
    Store(String),
}

impl From<PatientError> for AppError {
    fn from(error: PatientError) -> Self {
        let message = error.to_string();
        match error {
            PatientError::NotFound => AppError::NotFound(message),
            PatientError::InvalidDateOfBirth(_) | PatientError::InvalidInput(_) => {
                AppError::ValidationError(message)
            }
            PatientError::Unauthorized => AppError::Forbidden(message),
            PatientError::Account(auth_error) => AppError::from(auth_error),
            PatientError::Store(_) => AppError::Internal(message),
        }
    }
}
