use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use doctor_cell::{Doctor, DoctorError, WeeklyAvailability};
use patient_cell::{Patient, PatientError};
use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_models::time::MinuteOfDay;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub time: MinuteOfDay,
    pub status: AppointmentStatus,
    pub reason: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// Anything not cancelled still holds its slot.
    pub fn is_active(&self) -> bool {
        self.status != AppointmentStatus::Cancelled
    }

    pub fn occupies(&self, doctor_id: Uuid, date: NaiveDate, time: MinuteOfDay) -> bool {
        self.is_active() && self.doctor_id == doctor_id && self.date == date && self.time == time
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[serde(alias = "pending")]
    Requested,
    Confirmed,
    Cancelled,
    Completed,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Requested => write!(f, "requested"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for AppointmentStatus {
    type Err = AppointmentError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "requested" | "pending" => Ok(AppointmentStatus::Requested),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "cancelled" | "canceled" => Ok(AppointmentStatus::Cancelled),
            "completed" => Ok(AppointmentStatus::Completed),
            other => Err(AppointmentError::InvalidInput(format!(
                "Unknown appointment status '{}'",
                other
            ))),
        }
    }
}

// ==============================================================================
// REQUEST / RESPONSE MODELS
// ==============================================================================

/// Booking payload as sent by clients; every field is validated by the booking service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub doctor_id: String,
    pub date: String,
    pub time: String,
    pub reason: String,
}

/// A booking request that passed input validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub time: MinuteOfDay,
    pub reason: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AvailableSlotsQuery {
    pub date: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AvailableSlotsResponse {
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub available_slots: Vec<MinuteOfDay>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardQuery {
    pub search: Option<String>,
}

/// Narrows `AppointmentStore::list`; unset fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppointmentFilter {
    pub doctor_id: Option<Uuid>,
    pub patient_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
}

impl AppointmentFilter {
    pub fn for_doctor(doctor_id: Uuid) -> Self {
        Self {
            doctor_id: Some(doctor_id),
            ..Self::default()
        }
    }

    pub fn for_patient(patient_id: Uuid) -> Self {
        Self {
            patient_id: Some(patient_id),
            ..Self::default()
        }
    }

    pub fn for_doctor_on(doctor_id: Uuid, date: NaiveDate) -> Self {
        Self {
            doctor_id: Some(doctor_id),
            date: Some(date),
            ..Self::default()
        }
    }

    pub fn matches(&self, appointment: &Appointment) -> bool {
        self.doctor_id.is_none_or(|id| appointment.doctor_id == id)
            && self.patient_id.is_none_or(|id| appointment.patient_id == id)
            && self.date.is_none_or(|date| appointment.date == date)
    }
}

/// An appointment with the names dashboards display next to it.
#[derive(Debug, Clone, Serialize)]
pub struct AppointmentDetails {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub doctor_name: Option<String>,
    pub patient_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PatientDashboard {
    pub upcoming: Vec<AppointmentDetails>,
    pub past: Vec<AppointmentDetails>,
    pub doctors: Vec<Doctor>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DoctorDashboard {
    pub today: Vec<AppointmentDetails>,
    pub upcoming: Vec<AppointmentDetails>,
    pub completed: Vec<AppointmentDetails>,
    pub schedule: Vec<WeeklyAvailability>,
    pub patients: Vec<Patient>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminDashboard {
    pub doctors: Vec<Doctor>,
    pub patients: Vec<Patient>,
    pub appointments: Vec<AppointmentDetails>,
    pub availability: Vec<WeeklyAvailability>,
}

// ==============================================================================
// BUSINESS RULES
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingRules {
    pub max_advance_days: i64,
}

impl Default for BookingRules {
    fn default() -> Self {
        Self {
            max_advance_days: 90,
        }
    }
}

impl BookingRules {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_advance_days: config.max_advance_booking_days,
        }
    }
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("The {time} slot on {date} is no longer available")]
    SlotUnavailable {
        doctor_id: Uuid,
        date: NaiveDate,
        time: MinuteOfDay,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Cannot change appointment status from {from} to {to}")]
    InvalidStatusTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Not allowed: {0}")]
    Forbidden(String),

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Patient not found")]
    PatientNotFound,

    #[error(transparent)]
    Schedule(#[from] DoctorError),

    #[error(transparent)]
    Patient(#[from] PatientError),

    #[error("Booking window of {0} days is out of range")]
    BookingWindow(i64),

    #[error("Appointment store unavailable: {0}")]
    Store(String),
}

impl From<AppointmentError> for AppError {
    fn from(error: AppointmentError) -> Self {
        let message = error.to_string();
        match error {
            AppointmentError::NotFound
            | AppointmentError::DoctorNotFound
            | AppointmentError::PatientNotFound => AppError::NotFound(message),
            AppointmentError::SlotUnavailable { .. }
            | AppointmentError::InvalidStatusTransition { .. } => AppError::Conflict(message),
            AppointmentError::InvalidInput(_) => AppError::ValidationError(message),
            AppointmentError::Forbidden(_) => AppError::Forbidden(message),
            AppointmentError::Schedule(doctor_error) => AppError::from(doctor_error),
            AppointmentError::Patient(patient_error) => AppError::from(patient_error),
            AppointmentError::BookingWindow(_) | AppointmentError::Store(_) => {
                AppError::Internal(message)
            }
        }
    }
}
