use std::collections::BTreeSet;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, instrument};
use uuid::Uuid;

use auth_cell::{AccountDirectory, NewAccount};
use shared_models::auth::Role;

use crate::models::{
    CreateDoctorRequest, Doctor, DoctorError, DoctorSearchQuery, DEFAULT_DOCTOR_IMAGE_URL,
};

/// Doctor profiles keyed by the id of their `Doctor` account.
#[derive(Debug, Default)]
pub struct DoctorDirectory {
    doctors: RwLock<Vec<Doctor>>,
}

impl DoctorDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the doctor's account and store their profile under the same id.
    #[instrument(skip(self, accounts, request), fields(email = %request.email))]
    pub fn create_doctor(
        &self,
        accounts: &AccountDirectory,
        request: CreateDoctorRequest,
    ) -> Result<Doctor, DoctorError> {
        let specialty = request.specialty.trim().to_string();
        if specialty.is_empty() {
            return Err(DoctorError::InvalidInput("Specialty is required".to_string()));
        }

        // Hold the profile lock before the account exists
        let mut doctors = self.write()?;

        let account = accounts.register(NewAccount {
            name: request.name,
            email: request.email,
            password: request.password,
            role: Role::Doctor,
        })?;

        let bio = request
            .bio
            .map(|bio| bio.trim().to_string())
            .filter(|bio| !bio.is_empty())
            .unwrap_or_else(|| default_bio(&account.name, &specialty));

        let image_url = request
            .image_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_DOCTOR_IMAGE_URL.to_string());

        let doctor = Doctor {
            id: account.id,
            name: account.name,
            email: account.email,
            specialty,
            bio,
            image_url,
            created_at: account.created_at,
        };

        doctors.push(doctor.clone());

        info!("Doctor profile {} created", doctor.id);
        Ok(doctor)
    }

    pub fn list(&self, query: &DoctorSearchQuery) -> Result<Vec<Doctor>, DoctorError> {
        debug!("Listing doctors with query: {:?}", query);

        let search = query.search.as_deref().unwrap_or_default();
        let specialty = query
            .specialty
            .as_deref()
            .map(str::trim)
            .filter(|specialty| !specialty.is_empty());

        let mut doctors: Vec<Doctor> = self
            .read()?
            .iter()
            .filter(|doctor| doctor.matches_search(search))
            .filter(|doctor| {
                specialty.is_none_or(|specialty| doctor.specialty.eq_ignore_ascii_case(specialty))
            })
            .cloned()
            .collect();

        doctors.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(doctors)
    }

    /// Distinct specialties in alphabetical order.
    pub fn specialties(&self) -> Result<Vec<String>, DoctorError> {
        let specialties: BTreeSet<String> = self
            .read()?
            .iter()
            .map(|doctor| doctor.specialty.clone())
            .collect();
        Ok(specialties.into_iter().collect())
    }

    pub fn get(&self, doctor_id: Uuid) -> Result<Doctor, DoctorError> {
        self.read()?
            .iter()
            .find(|doctor| doctor.id == doctor_id)
            .cloned()
            .ok_or(DoctorError::NotFound)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Doctor>>, DoctorError> {
        self.doctors
            .read()
            .map_err(|_| DoctorError::Store("doctor directory lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Doctor>>, DoctorError> {
        self.doctors
            .write()
            .map_err(|_| DoctorError::Store("doctor directory lock poisoned".to_string()))
    }
}

fn default_bio(name: &str, specialty: &str) -> String {
    let name = name.strip_prefix("Dr. ").unwrap_or(name);
    format!("Dr. {} is a specialist in {}.", name, specialty)
}
