use std::sync::Arc;

use doctor_cell::{DoctorDirectory, ScheduleBook};
use patient_cell::PatientRegistry;
use shared_config::AppConfig;

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod store;

pub use models::{Appointment, AppointmentError, AppointmentStatus, BookingRules};
pub use services::{BookingService, DashboardService};
pub use store::{AppointmentStore, InMemoryAppointmentStore};

#[derive(Clone)]
pub struct AppointmentState {
    pub config: Arc<AppConfig>,
    pub booking: Arc<BookingService>,
    pub dashboards: Arc<DashboardService>,
}

impl AppointmentState {
    /// Wire one booking service and one dashboard view over a shared store.
    pub fn new(
        config: Arc<AppConfig>,
        store: Arc<dyn AppointmentStore>,
        doctors: Arc<DoctorDirectory>,
        patients: Arc<PatientRegistry>,
        schedules: Arc<ScheduleBook>,
    ) -> Self {
        let booking = BookingService::new(
            schedules.clone(),
            store.clone(),
            doctors.clone(),
            patients.clone(),
            BookingRules::from_config(&config),
        );
        let dashboards = DashboardService::new(store, doctors, patients, schedules);

        Self {
            config,
            booking: Arc::new(booking),
            dashboards: Arc::new(dashboards),
        }
    }
}
