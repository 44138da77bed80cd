use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::models::{Appointment, AppointmentError, AppointmentFilter, AppointmentStatus};

/// Persistence seam for appointments.
///
/// `append` and `set_status` are only called from `BookingService` while it
/// holds its admission lock, or by the host while seeding.
#[cfg_attr(test, mockall::automock)]
pub trait AppointmentStore: Send + Sync {
    /// Matching appointments ordered by date then time.
    fn list(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>, AppointmentError>;

    fn get(&self, appointment_id: Uuid) -> Result<Appointment, AppointmentError>;

    fn append(&self, appointment: Appointment) -> Result<Appointment, AppointmentError>;

    fn set_status(
        &self,
        appointment_id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Appointment, AppointmentError>;
}

#[derive(Debug, Default)]
pub struct InMemoryAppointmentStore {
    appointments: RwLock<Vec<Appointment>>,
}

impl InMemoryAppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Appointment>>, AppointmentError> {
        self.appointments
            .read()
            .map_err(|_| AppointmentError::Store("appointment store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Appointment>>, AppointmentError> {
        self.appointments
            .write()
            .map_err(|_| AppointmentError::Store("appointment store lock poisoned".to_string()))
    }
}

impl AppointmentStore for InMemoryAppointmentStore {
    fn list(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>, AppointmentError> {
        let mut appointments: Vec<Appointment> = self
            .read()?
            .iter()
            .filter(|appointment| filter.matches(appointment))
            .cloned()
            .collect();
        appointments.sort_by_key(|appointment| (appointment.date, appointment.time));
        Ok(appointments)
    }

    fn get(&self, appointment_id: Uuid) -> Result<Appointment, AppointmentError> {
        self.read()?
            .iter()
            .find(|appointment| appointment.id == appointment_id)
            .cloned()
            .ok_or(AppointmentError::NotFound)
    }

    fn append(&self, appointment: Appointment) -> Result<Appointment, AppointmentError> {
        debug!("Appending appointment {}", appointment.id);
        self.write()?.push(appointment.clone());
        Ok(appointment)
    }

    fn set_status(
        &self,
        appointment_id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Appointment, AppointmentError> {
        let mut appointments = self.write()?;
        let appointment = appointments
            .iter_mut()
            .find(|appointment| appointment.id == appointment_id)
            .ok_or(AppointmentError::NotFound)?;

        appointment.status = status;
        appointment.updated_at = Utc::now();
        Ok(appointment.clone())
    }
}
