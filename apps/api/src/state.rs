use std::sync::Arc;

use appointment_cell::{AppointmentState, InMemoryAppointmentStore};
use auth_cell::{AccountDirectory, AuthState};
use doctor_cell::{DoctorDirectory, DoctorState, ScheduleBook};
use patient_cell::{PatientRegistry, PatientState};
use shared_config::AppConfig;

/// Every in-memory store the portal runs on, created once at startup.
#[derive(Clone)]
pub struct AppServices {
    pub config: Arc<AppConfig>,
    pub accounts: Arc<AccountDirectory>,
    pub doctors: Arc<DoctorDirectory>,
    pub patients: Arc<PatientRegistry>,
    pub schedules: Arc<ScheduleBook>,
    pub appointments: Arc<InMemoryAppointmentStore>,
}

impl AppServices {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
            accounts: Arc::new(AccountDirectory::new()),
            doctors: Arc::new(DoctorDirectory::new()),
            patients: Arc::new(PatientRegistry::new()),
            schedules: Arc::new(ScheduleBook::new()),
            appointments: Arc::new(InMemoryAppointmentStore::new()),
        }
    }

    pub fn auth_state(&self) -> Arc<AuthState> {
        Arc::new(AuthState::new(self.config.clone(), self.accounts.clone()))
    }

    pub fn doctor_state(&self) -> Arc<DoctorState> {
        Arc::new(DoctorState::new(
            self.config.clone(),
            self.accounts.clone(),
            self.doctors.clone(),
            self.schedules.clone(),
        ))
    }

    pub fn patient_state(&self) -> Arc<PatientState> {
        Arc::new(PatientState::new(
            self.config.clone(),
            self.accounts.clone(),
            self.patients.clone(),
        ))
    }

    pub fn appointment_state(&self) -> Arc<AppointmentState> {
        Arc::new(AppointmentState::new(
            self.config.clone(),
            self.appointments.clone(),
            self.doctors.clone(),
            self.patients.clone(),
            self.schedules.clone(),
        ))
    }
}
