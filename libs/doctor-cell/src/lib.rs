use std::sync::Arc;

use auth_cell::AccountDirectory;
use shared_config::AppConfig;

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{Doctor, DoctorError, WeeklyAvailability};
pub use services::{
    enumerate_slots, DoctorDirectory, ScheduleBook, ScheduleProvider, SlotWindow,
    SLOT_GRANULARITY_MINUTES,
};

#[derive(Clone)]
pub struct DoctorState {
    pub config: Arc<AppConfig>,
    pub accounts: Arc<AccountDirectory>,
    pub doctors: Arc<DoctorDirectory>,
    pub schedules: Arc<ScheduleBook>,
}

impl DoctorState {
    pub fn new(
        config: Arc<AppConfig>,
        accounts: Arc<AccountDirectory>,
        doctors: Arc<DoctorDirectory>,
        schedules: Arc<ScheduleBook>,
    ) -> Self {
        Self {
            config,
            accounts,
            doctors,
            schedules,
        }
    }
}
