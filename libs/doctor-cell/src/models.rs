use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use auth_cell::AuthError;
use shared_models::error::AppError;
use shared_models::time::MinuteOfDay;

pub const DEFAULT_DOCTOR_IMAGE_URL: &str =
    "https://images.pexels.com/photos/5452293/pexels-photo-5452293.jpeg";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub specialty: String,
    pub bio: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

impl Doctor {
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.name.to_lowercase().contains(&term)
            || self.specialty.to_lowercase().contains(&term)
    }
}

/// A recurring weekly window during which a doctor accepts appointments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyAvailability {
    pub id: Uuid,
    pub doctor_id: Uuid,
    #[serde(with = "weekday_name")]
    pub weekday: Weekday,
    pub start_time: MinuteOfDay,
    pub end_time: MinuteOfDay,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDoctorRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub specialty: String,
    pub bio: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAvailabilityRequest {
    #[serde(with = "weekday_name")]
    pub weekday: Weekday,
    pub start_time: MinuteOfDay,
    pub end_time: MinuteOfDay,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DoctorSearchQuery {
    pub search: Option<String>,
    pub specialty: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DoctorWithSchedule {
    pub doctor: Doctor,
    pub schedule: Vec<WeeklyAvailability>,
}

#[derive(Error, Debug)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error("Doctor {doctor_id} has no availability on {weekday}")]
    NoScheduleForDay { doctor_id: Uuid, weekday: Weekday },

    #[error("Availability entry not found")]
    AvailabilityNotFound,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Schedule conflict: {0}")]
    ScheduleConflict(String),

    #[error(transparent)]
    Account(#[from] AuthError),

    #[error("Doctor store unavailable: {0}")]
    Store(String),
}

impl From<DoctorError> for AppError {
    fn from(error: DoctorError) -> Self {
        let message = error.to_string();
        match error {
            DoctorError::NotFound | DoctorError::AvailabilityNotFound => AppError::NotFound(message),
            DoctorError::NoScheduleForDay { .. } => AppError::NotFound(message),
            DoctorError::InvalidInput(_) => AppError::ValidationError(message),
            DoctorError::ScheduleConflict(_) => AppError::Conflict(message),
            DoctorError::Account(auth_error) => AppError::from(auth_error),
            DoctorError::Store(_) => AppError::Internal(message),
        }
    }
}

/// Serde adapter writing weekdays as full English names ("Monday").
pub mod weekday_name {
    use chrono::Weekday;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn full_name(weekday: Weekday) -> &'static str {
        match weekday {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        }
    }

    pub fn serialize<S: Serializer>(weekday: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(full_name(*weekday))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Weekday, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.trim()
            .parse::<Weekday>()
            .map_err(|_| serde::de::Error::custom(format!("invalid weekday '{}'", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_uses_full_names_on_the_wire() {
        let entry = WeeklyAvailability {
            id: Uuid::nil(),
            doctor_id: Uuid::nil(),
            weekday: Weekday::Wed,
            start_time: MinuteOfDay::from_hm(9, 0).unwrap(),
            end_time: MinuteOfDay::from_hm(17, 0).unwrap(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["weekday"], "Wednesday");
        assert_eq!(json["start_time"], "09:00");

        let request: CreateAvailabilityRequest = serde_json::from_str(
            r#"{"weekday": "friday", "start_time": "09:00", "end_time": 780}"#,
        )
        .unwrap();
        assert_eq!(request.weekday, Weekday::Fri);
        assert_eq!(request.end_time.to_string(), "13:00");
    }

    #[test]
    fn test_search_matches_name_or_specialty() {
        let doctor = Doctor {
            id: Uuid::new_v4(),
            name: "Dr. Michael Chen".to_string(),
            email: "michael@hospital.com".to_string(),
            specialty: "Neurology".to_string(),
            bio: String::new(),
            image_url: String::new(),
            created_at: Utc::now(),
        };
        assert!(doctor.matches_search("chen"));
        assert!(doctor.matches_search("NEURO"));
        assert!(doctor.matches_search(""));
        assert!(!doctor.matches_search("cardio"));
    }
}
