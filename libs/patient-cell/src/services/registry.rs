use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDate;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use auth_cell::{Account, AccountDirectory, NewAccount};
use shared_models::auth::{Role, User};

use crate::models::{Patient, PatientError, RegisterPatientRequest};

/// Patient profiles keyed by the id of their `Patient` account.
#[derive(Debug, Default)]
pub struct PatientRegistry {
    patients: RwLock<Vec<Patient>>,
}

impl PatientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the patient account and profile. `today` bounds the date of birth.
    #[instrument(skip(self, accounts, request), fields(email = %request.email))]
    pub fn register(
        &self,
        accounts: &AccountDirectory,
        request: RegisterPatientRequest,
        today: NaiveDate,
    ) -> Result<(Account, Patient), PatientError> {
        let date_of_birth = NaiveDate::parse_from_str(request.date_of_birth.trim(), "%Y-%m-%d")
            .map_err(|_| PatientError::InvalidDateOfBirth("expected YYYY-MM-DD".to_string()))?;
        if date_of_birth > today {
            return Err(PatientError::InvalidDateOfBirth(
                "date of birth is in the future".to_string(),
            ));
        }

        let phone = request.phone.trim().to_string();
        if phone.is_empty() {
            return Err(PatientError::InvalidInput("Phone number is required".to_string()));
        }

        // Hold the profile lock before the account exists
        let mut patients = self.write()?;

        let account = accounts.register(NewAccount {
            name: request.name,
            email: request.email,
            password: request.password,
            role: Role::Patient,
        })?;

        let patient = Patient {
            id: account.id,
            name: account.name.clone(),
            email: account.email.clone(),
            date_of_birth,
            phone,
            medical_history: request
                .medical_history
                .map(|history| history.trim().to_string())
                .filter(|history| !history.is_empty()),
            created_at: account.created_at,
        };

        patients.push(patient.clone());

        info!("Patient profile {} created", patient.id);
        Ok((account, patient))
    }

    pub fn get(&self, patient_id: Uuid) -> Result<Patient, PatientError> {
        self.read()?
            .iter()
            .find(|patient| patient.id == patient_id)
            .cloned()
            .ok_or(PatientError::NotFound)
    }

    /// Patients visible to `caller`: themself, or anyone for doctors and admins.
    pub fn get_for(&self, patient_id: Uuid, caller: &User) -> Result<Patient, PatientError> {
        let allowed = match caller.role {
            Role::Admin | Role::Doctor => true,
            Role::Patient => caller.id == patient_id,
        };
        if !allowed {
            debug!("User {} denied access to patient {}", caller.id, patient_id);
            return Err(PatientError::Unauthorized);
        }
        self.get(patient_id)
    }

    pub fn list(&self, search: Option<&str>) -> Result<Vec<Patient>, PatientError> {
        let search = search.unwrap_or_default();
        let mut patients: Vec<Patient> = self
            .read()?
            .iter()
            .filter(|patient| patient.matches_search(search))
            .cloned()
            .collect();
        patients.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(patients)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Patient>>, PatientError> {
        self.patients
            .read()
            .map_err(|_| PatientError::Store("patient registry lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Patient>>, PatientError> {
        self.patients
            .write()
            .map_err(|_| PatientError::Store("patient registry lock poisoned".to_string()))
    }
}
