use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{Duration, NaiveDate, Utc};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use doctor_cell::{enumerate_slots, DoctorDirectory, DoctorError, ScheduleProvider};
use patient_cell::{PatientError, PatientRegistry};
use shared_models::auth::User;
use shared_models::time::MinuteOfDay;

use crate::models::{
    Appointment, AppointmentError, AppointmentFilter, AppointmentStatus, BookAppointmentRequest,
    BookingRequest, BookingRules,
};
use crate::services::availability::filter_available;
use crate::services::lifecycle::AppointmentLifecycleService;
use crate::store::AppointmentStore;

/// Owns slot queries, booking admission and status changes for one appointment store.
///
/// Admission and status transitions are serialized through `admission`, so two
/// requests for the same slot can never both be accepted.
pub struct BookingService {
    schedule: Arc<dyn ScheduleProvider>,
    store: Arc<dyn AppointmentStore>,
    doctors: Arc<DoctorDirectory>,
    patients: Arc<PatientRegistry>,
    lifecycle_service: AppointmentLifecycleService,
    rules: BookingRules,
    admission: Mutex<()>,
}

impl BookingService {
    pub fn new(
        schedule: Arc<dyn ScheduleProvider>,
        store: Arc<dyn AppointmentStore>,
        doctors: Arc<DoctorDirectory>,
        patients: Arc<PatientRegistry>,
        rules: BookingRules,
    ) -> Self {
        Self {
            schedule,
            store,
            doctors,
            patients,
            lifecycle_service: AppointmentLifecycleService::new(),
            rules,
            admission: Mutex::new(()),
        }
    }

    pub fn rules(&self) -> BookingRules {
        self.rules
    }

    /// Free slots for a doctor on a date; a day without schedule has none.
    pub fn available_slots(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<MinuteOfDay>, AppointmentError> {
        debug!("Querying available slots for doctor {} on {}", doctor_id, date);
        self.ensure_doctor(doctor_id)?;
        self.free_slots(doctor_id, date)
    }

    /// Validate a raw booking payload from `patient_id` and admit it.
    #[instrument(skip(self, request))]
    pub fn book(
        &self,
        patient_id: Uuid,
        request: BookAppointmentRequest,
        today: NaiveDate,
    ) -> Result<Appointment, AppointmentError> {
        let request = self.validate_request(patient_id, request, today)?;
        self.admit(request)
    }

    /// Check a raw booking payload without touching the store.
    pub fn validate_request(
        &self,
        patient_id: Uuid,
        request: BookAppointmentRequest,
        today: NaiveDate,
    ) -> Result<BookingRequest, AppointmentError> {
        // Parse identifiers and wall-clock fields
        let doctor_id = Uuid::parse_str(request.doctor_id.trim())
            .map_err(|_| AppointmentError::InvalidInput("Invalid doctor ID format".to_string()))?;

        let date = NaiveDate::parse_from_str(request.date.trim(), "%Y-%m-%d").map_err(|_| {
            AppointmentError::InvalidInput("Date must use the YYYY-MM-DD format".to_string())
        })?;

        let time = request
            .time
            .trim()
            .parse::<MinuteOfDay>()
            .map_err(|_| AppointmentError::InvalidInput("Time must use the HH:MM format".to_string()))?;

        let reason = request.reason.trim();
        if reason.is_empty() {
            return Err(AppointmentError::InvalidInput(
                "A reason for the visit is required".to_string(),
            ));
        }

        // Booking window: today through today + max_advance_days
        let last_bookable = Duration::try_days(self.rules.max_advance_days)
            .filter(|window| *window >= Duration::zero())
            .and_then(|window| today.checked_add_signed(window))
            .ok_or(AppointmentError::BookingWindow(self.rules.max_advance_days))?;
        if date < today {
            return Err(AppointmentError::InvalidInput(
                "Appointments cannot be booked in the past".to_string(),
            ));
        }
        if date > last_bookable {
            return Err(AppointmentError::InvalidInput(format!(
                "Appointments can be booked at most {} days in advance",
                self.rules.max_advance_days
            )));
        }

        Ok(BookingRequest {
            patient_id,
            doctor_id,
            date,
            time,
            reason: reason.to_string(),
        })
    }

    /// Re-check the slot against current state and append the appointment.
    #[instrument(skip(self, request), fields(doctor_id = %request.doctor_id, date = %request.date, time = %request.time))]
    pub fn admit(&self, request: BookingRequest) -> Result<Appointment, AppointmentError> {
        self.ensure_doctor(request.doctor_id)?;
        self.ensure_patient(request.patient_id)?;

        let _guard = self.lock()?;

        // Re-check under the lock
        let free = self.free_slots(request.doctor_id, request.date)?;
        if !free.contains(&request.time) {
            warn!("Slot {} on {} is not available", request.time, request.date);
            return Err(AppointmentError::SlotUnavailable {
                doctor_id: request.doctor_id,
                date: request.date,
                time: request.time,
            });
        }

        // Persist as requested
        let now = Utc::now();
        let appointment = self.store.append(Appointment {
            id: Uuid::new_v4(),
            patient_id: request.patient_id,
            doctor_id: request.doctor_id,
            date: request.date,
            time: request.time,
            status: AppointmentStatus::Requested,
            reason: request.reason,
            created_at: now,
            updated_at: now,
        })?;

        info!("Appointment {} booked", appointment.id);
        Ok(appointment)
    }

    pub fn transition_status(
        &self,
        appointment_id: Uuid,
        new_status: AppointmentStatus,
        actor: &User,
    ) -> Result<Appointment, AppointmentError> {
        let _guard = self.lock()?;

        let appointment = self.store.get(appointment_id)?;

        // Actor first, then the state machine
        self.lifecycle_service
            .authorize_transition(&appointment, new_status, actor)?;
        self.lifecycle_service
            .validate_status_transition(appointment.status, new_status)?;

        let updated = self.store.set_status(appointment_id, new_status)?;
        info!(
            "Appointment {} moved from {} to {} by {}",
            appointment_id, appointment.status, new_status, actor.id
        );
        Ok(updated)
    }

    pub fn get_for(&self, appointment_id: Uuid, actor: &User) -> Result<Appointment, AppointmentError> {
        let appointment = self.store.get(appointment_id)?;
        if !self.lifecycle_service.can_view(&appointment, actor) {
            return Err(AppointmentError::Forbidden(
                "You cannot view this appointment".to_string(),
            ));
        }
        Ok(appointment)
    }

    fn free_slots(&self, doctor_id: Uuid, date: NaiveDate) -> Result<Vec<MinuteOfDay>, AppointmentError> {
        let window = match enumerate_slots(self.schedule.as_ref(), doctor_id, date) {
            Ok(window) => window,
            Err(DoctorError::NoScheduleForDay { .. }) => return Ok(Vec::new()),
            Err(error) => return Err(error.into()),
        };

        let booked = self
            .store
            .list(&AppointmentFilter::for_doctor_on(doctor_id, date))?;
        Ok(filter_available(&window, &booked))
    }

    fn ensure_doctor(&self, doctor_id: Uuid) -> Result<(), AppointmentError> {
        match self.doctors.get(doctor_id) {
            Ok(_) => Ok(()),
            Err(DoctorError::NotFound) => Err(AppointmentError::DoctorNotFound),
            Err(error) => Err(error.into()),
        }
    }

    fn ensure_patient(&self, patient_id: Uuid) -> Result<(), AppointmentError> {
        match self.patients.get(patient_id) {
            Ok(_) => Ok(()),
            Err(PatientError::NotFound) => Err(AppointmentError::PatientNotFound),
            Err(error) => Err(error.into()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, AppointmentError> {
        self.admission
            .lock()
            .map_err(|_| AppointmentError::Store("booking lock poisoned".to_string()))
    }
}
