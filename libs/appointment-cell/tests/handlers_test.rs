use std::sync::Arc;

use assert_matches::assert_matches;
use axum::{
    body::{to_bytes, Body},
    extract::{Extension, Json, Path, Query, State},
    http::{Request, StatusCode},
};
use chrono::{Datelike, Duration, NaiveDate, Utc};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use appointment_cell::handlers::*;
use appointment_cell::models::{
    AvailableSlotsQuery, BookAppointmentRequest, DashboardQuery, StatusUpdateRequest,
};
use appointment_cell::router::appointment_routes;
use appointment_cell::{AppointmentState, AppointmentStatus, InMemoryAppointmentStore};
use auth_cell::AccountDirectory;
use doctor_cell::models::{CreateAvailabilityRequest, CreateDoctorRequest};
use doctor_cell::{DoctorDirectory, ScheduleBook};
use patient_cell::models::RegisterPatientRequest;
use patient_cell::PatientRegistry;
use shared_models::auth::User;
use shared_models::error::AppError;
use shared_models::time::MinuteOfDay;
use shared_utils::test_utils::{JwtTestUtils, TestConfig, TestUser};

struct TestContext {
    state: Arc<AppointmentState>,
    doctor: User,
    patient: User,
    booking_date: NaiveDate,
}

fn setup() -> TestContext {
    let accounts = AccountDirectory::new();
    let doctors = Arc::new(DoctorDirectory::new());
    let patients = Arc::new(PatientRegistry::new());
    let schedules = Arc::new(ScheduleBook::new());
    let today = Utc::now().date_naive();
    let booking_date = today + Duration::days(7);

    let doctor = doctors
        .create_doctor(
            &accounts,
            CreateDoctorRequest {
                name: "Dr. Michael Chen".to_string(),
                email: "michael@hospital.com".to_string(),
                password: "doctor123".to_string(),
                specialty: "Neurology".to_string(),
                bio: None,
                image_url: None,
            },
        )
        .unwrap();
    let (_, patient) = patients
        .register(
            &accounts,
            RegisterPatientRequest {
                name: "John Smith".to_string(),
                email: "john@example.com".to_string(),
                password: "patient123".to_string(),
                date_of_birth: "1985-05-15".to_string(),
                phone: "555-123-4567".to_string(),
                medical_history: Some("Hypertension".to_string()),
            },
            today,
        )
        .unwrap();

    schedules
        .create_availability(
            doctor.id,
            CreateAvailabilityRequest {
                weekday: booking_date.weekday(),
                start_time: MinuteOfDay::from_hm(10, 0).unwrap(),
                end_time: MinuteOfDay::from_hm(12, 0).unwrap(),
            },
        )
        .unwrap();

    let state = AppointmentState::new(
        TestConfig::default().to_arc(),
        Arc::new(InMemoryAppointmentStore::new()),
        doctors,
        patients,
        schedules,
    );

    TestContext {
        state: Arc::new(state),
        doctor: TestUser::doctor("michael@hospital.com").with_id(doctor.id).to_user(),
        patient: TestUser::patient("john@example.com").with_id(patient.id).to_user(),
        booking_date,
    }
}

fn booking(ctx: &TestContext, time: &str) -> BookAppointmentRequest {
    BookAppointmentRequest {
        doctor_id: ctx.doctor.id.to_string(),
        date: ctx.booking_date.to_string(),
        time: time.to_string(),
        reason: "Migraines".to_string(),
    }
}

async fn slots(ctx: &TestContext) -> Vec<String> {
    let Json(response) = get_available_slots(
        State(ctx.state.clone()),
        Path(ctx.doctor.id.to_string()),
        Query(AvailableSlotsQuery {
            date: Some(ctx.booking_date.to_string()),
        }),
    )
    .await
    .unwrap();
    response
        .available_slots
        .iter()
        .map(ToString::to_string)
        .collect()
}

#[tokio::test]
async fn test_book_then_slot_disappears() {
    let ctx = setup();
    assert_eq!(slots(&ctx).await, vec!["10:00", "10:30", "11:00", "11:30"]);

    let (status, Json(appointment)) = book_appointment(
        State(ctx.state.clone()),
        Extension(ctx.patient.clone()),
        Json(booking(&ctx, "10:30")),
    )
    .await
    .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(appointment.status, AppointmentStatus::Requested);
    assert_eq!(appointment.patient_id, ctx.patient.id);
    assert_eq!(slots(&ctx).await, vec!["10:00", "11:00", "11:30"]);

    let second = book_appointment(
        State(ctx.state.clone()),
        Extension(ctx.patient.clone()),
        Json(booking(&ctx, "10:30")),
    )
    .await;
    assert_matches!(second, Err(AppError::Conflict(_)));
}

#[tokio::test]
async fn test_slots_query_validation() {
    let ctx = setup();

    let missing_date = get_available_slots(
        State(ctx.state.clone()),
        Path(ctx.doctor.id.to_string()),
        Query(AvailableSlotsQuery { date: None }),
    )
    .await;
    assert_matches!(missing_date, Err(AppError::ValidationError(_)));

    let unknown_doctor = get_available_slots(
        State(ctx.state.clone()),
        Path(Uuid::new_v4().to_string()),
        Query(AvailableSlotsQuery {
            date: Some(ctx.booking_date.to_string()),
        }),
    )
    .await;
    assert_matches!(unknown_doctor, Err(AppError::NotFound(_)));

    let Json(other_day) = get_available_slots(
        State(ctx.state.clone()),
        Path(ctx.doctor.id.to_string()),
        Query(AvailableSlotsQuery {
            date: Some((ctx.booking_date + Duration::days(1)).to_string()),
        }),
    )
    .await
    .unwrap();
    assert!(other_day.available_slots.is_empty());
}

#[tokio::test]
async fn test_only_patients_book() {
    let ctx = setup();

    let result = book_appointment(
        State(ctx.state.clone()),
        Extension(ctx.doctor.clone()),
        Json(booking(&ctx, "10:00")),
    )
    .await;
    assert_matches!(result, Err(AppError::Forbidden(_)));

    let mut malformed = booking(&ctx, "10:00");
    malformed.date = "next tuesday".to_string();
    let result = book_appointment(State(ctx.state.clone()), Extension(ctx.patient.clone()), Json(malformed)).await;
    assert_matches!(result, Err(AppError::ValidationError(_)));
}

#[tokio::test]
async fn test_status_workflow_and_access() {
    let ctx = setup();
    let (_, Json(appointment)) = book_appointment(
        State(ctx.state.clone()),
        Extension(ctx.patient.clone()),
        Json(booking(&ctx, "11:00")),
    )
    .await
    .unwrap();
    let id = appointment.id.to_string();

    let patient_confirms = update_appointment_status(
        State(ctx.state.clone()),
        Extension(ctx.patient.clone()),
        Path(id.clone()),
        Json(StatusUpdateRequest { status: "confirmed".to_string() }),
    )
    .await;
    assert_matches!(patient_confirms, Err(AppError::Forbidden(_)));

    let Json(confirmed) = update_appointment_status(
        State(ctx.state.clone()),
        Extension(ctx.doctor.clone()),
        Path(id.clone()),
        Json(StatusUpdateRequest { status: "confirmed".to_string() }),
    )
    .await
    .unwrap();
    assert_eq!(confirmed.status, AppointmentStatus::Confirmed);

    let unknown_status = update_appointment_status(
        State(ctx.state.clone()),
        Extension(ctx.doctor.clone()),
        Path(id.clone()),
        Json(StatusUpdateRequest { status: "no_show".to_string() }),
    )
    .await;
    assert_matches!(unknown_status, Err(AppError::ValidationError(_)));

    let Json(cancelled) = update_appointment_status(
        State(ctx.state.clone()),
        Extension(ctx.patient.clone()),
        Path(id.clone()),
        Json(StatusUpdateRequest { status: "cancelled".to_string() }),
    )
    .await
    .unwrap();
    assert_eq!(cancelled.status, AppointmentStatus::Cancelled);

    let reopen = update_appointment_status(
        State(ctx.state.clone()),
        Extension(ctx.doctor.clone()),
        Path(id.clone()),
        Json(StatusUpdateRequest { status: "confirmed".to_string() }),
    )
    .await;
    assert_matches!(reopen, Err(AppError::Conflict(_)));

    assert!(slots(&ctx).await.contains(&"11:00".to_string()));

    let stranger = TestUser::patient("maria@example.com").to_user();
    assert_matches!(
        get_appointment(State(ctx.state.clone()), Extension(stranger), Path(id.clone())).await,
        Err(AppError::Forbidden(_))
    );
    let Json(own) = get_appointment(State(ctx.state.clone()), Extension(ctx.patient.clone()), Path(id))
        .await
        .unwrap();
    assert_eq!(own.reason, "Migraines");
}

#[tokio::test]
async fn test_dashboards_require_matching_role() {
    let ctx = setup();
    book_appointment(
        State(ctx.state.clone()),
        Extension(ctx.patient.clone()),
        Json(booking(&ctx, "10:00")),
    )
    .await
    .unwrap();

    let Json(patient_view) = patient_dashboard(State(ctx.state.clone()), Extension(ctx.patient.clone()))
        .await
        .unwrap();
    assert_eq!(patient_view.upcoming.len(), 1);
    assert_eq!(patient_view.doctors.len(), 1);

    let Json(doctor_view) = doctor_dashboard(State(ctx.state.clone()), Extension(ctx.doctor.clone()))
        .await
        .unwrap();
    assert_eq!(doctor_view.upcoming.len(), 1);
    assert_eq!(doctor_view.patients[0].name, "John Smith");

    assert_matches!(
        doctor_dashboard(State(ctx.state.clone()), Extension(ctx.patient.clone())).await,
        Err(AppError::Forbidden(_))
    );
    assert_matches!(
        admin_dashboard(
            State(ctx.state.clone()),
            Extension(ctx.doctor.clone()),
            Query(DashboardQuery::default())
        )
        .await,
        Err(AppError::Forbidden(_))
    );

    let admin = TestUser::admin("admin@hospital.com").to_user();
    let Json(admin_view) = admin_dashboard(
        State(ctx.state.clone()),
        Extension(admin),
        Query(DashboardQuery {
            search: Some("chen".to_string()),
        }),
    )
    .await
    .unwrap();
    assert_eq!(admin_view.doctors.len(), 1);
    assert_eq!(admin_view.appointments.len(), 1);
    assert!(admin_view.patients.is_empty());
}

#[tokio::test]
async fn test_router_requires_token_for_booking() {
    let ctx = setup();
    let secret = ctx.state.config.jwt_secret.clone();
    let app = appointment_routes(ctx.state.clone());

    let uri = format!(
        "/doctors/{}/available-slots?date={}",
        ctx.doctor.id, ctx.booking_date
    );
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["available_slots"][0], "10:00");

    let payload = serde_json::to_string(&booking(&ctx, "10:00")).unwrap();
    let anonymous = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header("content-type", "application/json")
                .body(Body::from(payload.clone()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let patient = TestUser::patient("john@example.com").with_id(ctx.patient.id);
    let token = JwtTestUtils::create_test_token(&patient, &secret, None);
    let booked = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header("content-type", "application/json")
                .header("authorization", JwtTestUtils::bearer(&token))
                .body(Body::from(payload))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(booked.status(), StatusCode::CREATED);
}
