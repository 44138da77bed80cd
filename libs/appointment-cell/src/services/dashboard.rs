use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

use doctor_cell::models::DoctorSearchQuery;
use doctor_cell::{DoctorDirectory, ScheduleBook, ScheduleProvider};
use patient_cell::PatientRegistry;

use crate::models::{
    AdminDashboard, Appointment, AppointmentDetails, AppointmentError, AppointmentFilter,
    AppointmentStatus, DoctorDashboard, PatientDashboard,
};
use crate::store::AppointmentStore;

/// Read-only role views over appointments, doctors, patients and schedules.
pub struct DashboardService {
    store: Arc<dyn AppointmentStore>,
    doctors: Arc<DoctorDirectory>,
    patients: Arc<PatientRegistry>,
    schedules: Arc<ScheduleBook>,
}

struct NameIndex {
    doctors: HashMap<Uuid, String>,
    patients: HashMap<Uuid, String>,
}

impl NameIndex {
    fn details(&self, appointment: Appointment) -> AppointmentDetails {
        AppointmentDetails {
            doctor_name: self.doctors.get(&appointment.doctor_id).cloned(),
            patient_name: self.patients.get(&appointment.patient_id).cloned(),
            appointment,
        }
    }

    fn select<F>(&self, appointments: &[Appointment], keep: F) -> Vec<AppointmentDetails>
    where
        F: Fn(&Appointment) -> bool,
    {
        appointments
            .iter()
            .filter(|appointment| keep(*appointment))
            .map(|appointment| self.details(appointment.clone()))
            .collect()
    }
}

impl DashboardService {
    pub fn new(
        store: Arc<dyn AppointmentStore>,
        doctors: Arc<DoctorDirectory>,
        patients: Arc<PatientRegistry>,
        schedules: Arc<ScheduleBook>,
    ) -> Self {
        Self {
            store,
            doctors,
            patients,
            schedules,
        }
    }

    pub fn patient(&self, patient_id: Uuid, today: NaiveDate) -> Result<PatientDashboard, AppointmentError> {
        debug!("Building patient dashboard for {}", patient_id);
        let names = self.names()?;
        let appointments = self.store.list(&AppointmentFilter::for_patient(patient_id))?;

        // Doctors this patient has seen or will see
        let doctor_ids: HashSet<Uuid> = appointments.iter().map(|a| a.doctor_id).collect();
        let doctors = self
            .doctors
            .list(&DoctorSearchQuery::default())?
            .into_iter()
            .filter(|doctor| doctor_ids.contains(&doctor.id))
            .collect();

        Ok(PatientDashboard {
            upcoming: names.select(&appointments, |a| {
                a.date >= today && a.status != AppointmentStatus::Cancelled
            }),
            past: names.select(&appointments, |a| {
                a.date < today || a.status == AppointmentStatus::Completed
            }),
            doctors,
        })
    }

    pub fn doctor(&self, doctor_id: Uuid, today: NaiveDate) -> Result<DoctorDashboard, AppointmentError> {
        debug!("Building doctor dashboard for {}", doctor_id);
        let names = self.names()?;
        let appointments = self.store.list(&AppointmentFilter::for_doctor(doctor_id))?;

        // Patients with any appointment
        let patient_ids: HashSet<Uuid> = appointments.iter().map(|a| a.patient_id).collect();
        let patients = self
            .patients
            .list(None)?
            .into_iter()
            .filter(|patient| patient_ids.contains(&patient.id))
            .collect();

        Ok(DoctorDashboard {
            today: names.select(&appointments, |a| a.date == today),
            upcoming: names.select(&appointments, |a| {
                a.date > today && a.status != AppointmentStatus::Cancelled
            }),
            completed: names.select(&appointments, |a| a.status == AppointmentStatus::Completed),
            schedule: self.schedules.weekly_availability(doctor_id)?,
            patients,
        })
    }

    pub fn admin(&self, search: Option<&str>) -> Result<AdminDashboard, AppointmentError> {
        let term = search.unwrap_or_default().trim().to_lowercase();
        debug!("Building admin dashboard, search: {:?}", term);

        let names = self.names()?;
        let doctors = self.doctors.list(&DoctorSearchQuery {
            search: Some(term.clone()),
            specialty: None,
        })?;
        let patients = self.patients.list(Some(term.as_str()))?;

        let appointments = self
            .store
            .list(&AppointmentFilter::default())?
            .into_iter()
            .map(|a| names.details(a))
            .filter(|details| term.is_empty() || appointment_matches(details, &term))
            .collect();

        Ok(AdminDashboard {
            doctors,
            patients,
            appointments,
            availability: self.schedules.all()?,
        })
    }

    fn names(&self) -> Result<NameIndex, AppointmentError> {
        let doctors = self
            .doctors
            .list(&DoctorSearchQuery::default())?
            .into_iter()
            .map(|doctor| (doctor.id, doctor.name))
            .collect();
        let patients = self
            .patients
            .list(None)?
            .into_iter()
            .map(|patient| (patient.id, patient.name))
            .collect();
        Ok(NameIndex { doctors, patients })
    }
}

fn appointment_matches(details: &AppointmentDetails, term: &str) -> bool {
    let name_matches = |name: &Option<String>| {
        name.as_deref()
            .is_some_and(|name| name.to_lowercase().contains(term))
    };

    name_matches(&details.doctor_name)
        || name_matches(&details.patient_name)
        || details.appointment.date.to_string().contains(term)
        || details.appointment.status.to_string().contains(term)
}
