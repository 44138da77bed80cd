use std::sync::Arc;

use auth_cell::AccountDirectory;
use shared_config::AppConfig;

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{Patient, PatientError};
pub use services::PatientRegistry;

#[derive(Clone)]
pub struct PatientState {
    pub config: Arc<AppConfig>,
    pub accounts: Arc<AccountDirectory>,
    pub patients: Arc<PatientRegistry>,
}

impl PatientState {
    pub fn new(
        config: Arc<AppConfig>,
        accounts: Arc<AccountDirectory>,
        patients: Arc<PatientRegistry>,
    ) -> Self {
        Self {
            config,
            accounts,
            patients,
        }
    }
}
