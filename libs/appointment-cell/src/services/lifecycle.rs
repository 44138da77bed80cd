use tracing::{debug, warn};

use shared_models::auth::{Role, User};

use crate::models::{Appointment, AppointmentError, AppointmentStatus};

#[derive(Debug, Default, Clone, Copy)]
pub struct AppointmentLifecycleService;

impl AppointmentLifecycleService {
    pub fn new() -> Self {
        Self
    }

    /// Validate that a status transition is allowed
    pub fn validate_status_transition(
        &self,
        current_status: AppointmentStatus,
        new_status: AppointmentStatus,
    ) -> Result<(), AppointmentError> {
        debug!("Validating status transition from {} to {}", current_status, new_status);

        if !self.get_valid_transitions(current_status).contains(&new_status) {
            warn!("Invalid status transition attempted: {} -> {}", current_status, new_status);
            return Err(AppointmentError::InvalidStatusTransition {
                from: current_status,
                to: new_status,
            });
        }

        Ok(())
    }

    /// Get all valid next statuses for a given current status
    pub fn get_valid_transitions(&self, current_status: AppointmentStatus) -> Vec<AppointmentStatus> {
        match current_status {
            AppointmentStatus::Requested => {
                vec![AppointmentStatus::Confirmed, AppointmentStatus::Cancelled]
            }
            AppointmentStatus::Confirmed => {
                vec![AppointmentStatus::Completed, AppointmentStatus::Cancelled]
            }
            // Terminal states
            AppointmentStatus::Completed | AppointmentStatus::Cancelled => vec![],
        }
    }

    /// Check that `actor` may move `appointment` to `new_status`.
    pub fn authorize_transition(
        &self,
        appointment: &Appointment,
        new_status: AppointmentStatus,
        actor: &User,
    ) -> Result<(), AppointmentError> {
        let allowed = match actor.role {
            Role::Admin => true,
            Role::Doctor => appointment.doctor_id == actor.id,
            Role::Patient => {
                appointment.patient_id == actor.id && new_status == AppointmentStatus::Cancelled
            }
        };

        if !allowed {
            warn!(
                "User {} ({}) may not set appointment {} to {}",
                actor.id, actor.role, appointment.id, new_status
            );
            return Err(AppointmentError::Forbidden(format!(
                "A {} cannot set this appointment to {}",
                actor.role, new_status
            )));
        }

        Ok(())
    }

    /// Whether `actor` may read `appointment`.
    pub fn can_view(&self, appointment: &Appointment, actor: &User) -> bool {
        match actor.role {
            Role::Admin => true,
            Role::Doctor => appointment.doctor_id == actor.id,
            Role::Patient => appointment.patient_id == actor.id,
        }
    }
}
