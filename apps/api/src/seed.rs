use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc, Weekday};
use tracing::info;
use uuid::Uuid;

use appointment_cell::{Appointment, AppointmentStatus, AppointmentStore};
use auth_cell::NewAccount;
use doctor_cell::models::{CreateAvailabilityRequest, CreateDoctorRequest};
use patient_cell::models::RegisterPatientRequest;
use shared_models::auth::Role;
use shared_models::time::MinuteOfDay;

use crate::state::AppServices;

struct DemoDoctor {
    name: &'static str,
    email: &'static str,
    specialty: &'static str,
    bio: &'static str,
    image_url: &'static str,
    hours: &'static [(Weekday, &'static str, &'static str)],
}

const DEMO_DOCTORS: [DemoDoctor; 3] = [
    DemoDoctor {
        name: "Dr. Sarah Johnson",
        email: "sarah@hospital.com",
        specialty: "Cardiology",
        bio: "Dr. Johnson is a board-certified cardiologist with over 15 years of experience in treating heart conditions.",
        image_url: "https://images.pexels.com/photos/5452201/pexels-photo-5452201.jpeg",
        hours: &[
            (Weekday::Mon, "09:00", "17:00"),
            (Weekday::Wed, "09:00", "17:00"),
            (Weekday::Fri, "09:00", "13:00"),
        ],
    },
    DemoDoctor {
        name: "Dr. Michael Chen",
        email: "michael@hospital.com",
        specialty: "Neurology",
        bio: "Dr. Chen specializes in neurological disorders and has pioneered several treatment methods.",
        image_url: "https://images.pexels.com/photos/5452293/pexels-photo-5452293.jpeg",
        hours: &[
            (Weekday::Tue, "10:00", "18:00"),
            (Weekday::Thu, "10:00", "18:00"),
        ],
    },
    DemoDoctor {
        name: "Dr. Emily Rodriguez",
        email: "emily@hospital.com",
        specialty: "Pediatrics",
        bio: "Dr. Rodriguez has dedicated her career to providing compassionate care for children of all ages.",
        image_url: "https://images.pexels.com/photos/5214959/pexels-photo-5214959.jpeg",
        hours: &[
            (Weekday::Mon, "08:00", "16:00"),
            (Weekday::Tue, "08:00", "16:00"),
            (Weekday::Thu, "08:00", "16:00"),
        ],
    },
];

/// Load the demo portal: one admin, three doctors with weekly hours, two
/// patients and two appointments.
pub fn seed_demo_data(services: &AppServices) -> Result<()> {
    // Admin
    services
        .accounts
        .register(NewAccount {
            name: "Admin User".to_string(),
            email: "admin@hospital.com".to_string(),
            password: "admin123".to_string(),
            role: Role::Admin,
        })
        .context("seeding admin account")?;

    // Doctors and their weekly hours
    let mut doctor_ids = Vec::with_capacity(DEMO_DOCTORS.len());
    for demo in &DEMO_DOCTORS {
        let doctor = services
            .doctors
            .create_doctor(
                &services.accounts,
                CreateDoctorRequest {
                    name: demo.name.to_string(),
                    email: demo.email.to_string(),
                    password: "doctor123".to_string(),
                    specialty: demo.specialty.to_string(),
                    bio: Some(demo.bio.to_string()),
                    image_url: Some(demo.image_url.to_string()),
                },
            )
            .with_context(|| format!("seeding doctor {}", demo.email))?;

        for (weekday, start, end) in demo.hours {
            services.schedules.create_availability(
                doctor.id,
                CreateAvailabilityRequest {
                    weekday: *weekday,
                    start_time: start.parse::<MinuteOfDay>()?,
                    end_time: end.parse::<MinuteOfDay>()?,
                },
            )?;
        }
        doctor_ids.push(doctor.id);
    }

    // Patients
    let today = Utc::now().date_naive();
    let demo_patients = [
        ("John Smith", "john@example.com", "1985-05-15", "555-123-4567", "Hypertension, Allergies to penicillin"),
        ("Maria Garcia", "maria@example.com", "1990-08-22", "555-987-6543", "Asthma"),
    ];
    let mut patient_ids = Vec::with_capacity(demo_patients.len());
    for (name, email, date_of_birth, phone, history) in demo_patients {
        let (_, patient) = services
            .patients
            .register(
                &services.accounts,
                RegisterPatientRequest {
                    name: name.to_string(),
                    email: email.to_string(),
                    password: "patient123".to_string(),
                    date_of_birth: date_of_birth.to_string(),
                    phone: phone.to_string(),
                    medical_history: Some(history.to_string()),
                },
                today,
            )
            .with_context(|| format!("seeding patient {}", email))?;
        patient_ids.push(patient.id);
    }

    // Historical records are appended as-is, outside booking admission.
    let demo_appointments = [
        (patient_ids[0], doctor_ids[0], (2025, 6, 15), "10:00", AppointmentStatus::Confirmed, "Annual checkup"),
        (patient_ids[1], doctor_ids[2], (2025, 6, 16), "14:30", AppointmentStatus::Requested, "Fever and cough"),
    ];
    for (patient_id, doctor_id, (year, month, day), time, status, reason) in demo_appointments {
        let date = NaiveDate::from_ymd_opt(year, month, day).context("invalid demo date")?;
        let now = Utc::now();
        services.appointments.append(Appointment {
            id: Uuid::new_v4(),
            patient_id,
            doctor_id,
            date,
            time: time.parse::<MinuteOfDay>()?,
            status,
            reason: reason.to_string(),
            created_at: now,
            updated_at: now,
        })?;
    }

    info!(
        "Seeded demo data: {} doctors, {} patients, {} availability windows",
        doctor_ids.len(),
        patient_ids.len(),
        services.schedules.all()?.len()
    );
    Ok(())
}
