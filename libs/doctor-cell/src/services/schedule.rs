use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{CreateAvailabilityRequest, DoctorError, WeeklyAvailability};
use crate::services::slots::SLOT_GRANULARITY_MINUTES;

/// Read-only view of doctors' recurring weekly availability.
#[cfg_attr(test, mockall::automock)]
pub trait ScheduleProvider: Send + Sync {
    fn weekly_availability(&self, doctor_id: Uuid) -> Result<Vec<WeeklyAvailability>, DoctorError>;
}

/// In-memory weekly availability table, written by schedule administration.
#[derive(Debug, Default)]
pub struct ScheduleBook {
    entries: RwLock<Vec<WeeklyAvailability>>,
}

impl ScheduleBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_availability(
        &self,
        doctor_id: Uuid,
        request: CreateAvailabilityRequest,
    ) -> Result<WeeklyAvailability, DoctorError> {
        debug!("Creating {:?} availability for doctor: {}", request.weekday, doctor_id);

        // Validate time range
        if request.start_time >= request.end_time {
            return Err(DoctorError::InvalidInput(
                "Start time must be before end time".to_string(),
            ));
        }

        if !request.start_time.is_aligned_to(SLOT_GRANULARITY_MINUTES)
            || !request.end_time.is_aligned_to(SLOT_GRANULARITY_MINUTES)
        {
            return Err(DoctorError::InvalidInput(format!(
                "Start and end times must fall on {}-minute boundaries",
                SLOT_GRANULARITY_MINUTES
            )));
        }

        // One window per weekday
        let mut entries = self.write()?;
        if entries
            .iter()
            .any(|entry| entry.doctor_id == doctor_id && entry.weekday == request.weekday)
        {
            warn!("Doctor {} already has availability on {:?}", doctor_id, request.weekday);
            return Err(DoctorError::ScheduleConflict(format!(
                "Doctor already has availability on {}",
                crate::models::weekday_name::full_name(request.weekday)
            )));
        }

        let availability = WeeklyAvailability {
            id: Uuid::new_v4(),
            doctor_id,
            weekday: request.weekday,
            start_time: request.start_time,
            end_time: request.end_time,
        };
        entries.push(availability.clone());

        info!("Availability {} created for doctor {}", availability.id, doctor_id);
        Ok(availability)
    }

    pub fn remove_availability(&self, availability_id: Uuid) -> Result<WeeklyAvailability, DoctorError> {
        let mut entries = self.write()?;
        let position = entries
            .iter()
            .position(|entry| entry.id == availability_id)
            .ok_or(DoctorError::AvailabilityNotFound)?;

        let removed = entries.remove(position);
        info!("Availability {} removed for doctor {}", removed.id, removed.doctor_id);
        Ok(removed)
    }

    /// Every entry, ordered by doctor, weekday (Monday first) and start time.
    pub fn all(&self) -> Result<Vec<WeeklyAvailability>, DoctorError> {
        let mut entries = self.read()?.clone();
        sort_entries(&mut entries);
        Ok(entries)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<WeeklyAvailability>>, DoctorError> {
        self.entries
            .read()
            .map_err(|_| DoctorError::Store("schedule lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<WeeklyAvailability>>, DoctorError> {
        self.entries
            .write()
            .map_err(|_| DoctorError::Store("schedule lock poisoned".to_string()))
    }
}

impl ScheduleProvider for ScheduleBook {
    fn weekly_availability(&self, doctor_id: Uuid) -> Result<Vec<WeeklyAvailability>, DoctorError> {
        let mut entries: Vec<WeeklyAvailability> = self
            .read()?
            .iter()
            .filter(|entry| entry.doctor_id == doctor_id)
            .cloned()
            .collect();
        sort_entries(&mut entries);
        Ok(entries)
    }
}

fn sort_entries(entries: &mut [WeeklyAvailability]) {
    entries.sort_by_key(|entry| {
        (
            entry.doctor_id,
            entry.weekday.num_days_from_monday(),
            entry.start_time,
        )
    });
}
