use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use tracing::debug;

use shared_models::auth::{Role, User};
use shared_models::error::AppError;
use shared_utils::extractor::{parse_id, require_role};

use crate::models::{
    AdminDashboard, Appointment, AppointmentError, AppointmentStatus, AvailableSlotsQuery,
    AvailableSlotsResponse, BookAppointmentRequest, DashboardQuery, DoctorDashboard,
    PatientDashboard, StatusUpdateRequest,
};
use crate::AppointmentState;

// ==============================================================================
// AVAILABILITY & BOOKING
// ==============================================================================

#[axum::debug_handler]
pub async fn get_available_slots(
    State(state): State<Arc<AppointmentState>>,
    Path(doctor_id): Path<String>,
    Query(query): Query<AvailableSlotsQuery>,
) -> Result<Json<AvailableSlotsResponse>, AppError> {
    let doctor_id = parse_id(&doctor_id, "doctor")?;

    let raw_date = query.date.ok_or_else(|| {
        AppointmentError::InvalidInput("The date query parameter is required".to_string())
    })?;
    let date = NaiveDate::parse_from_str(raw_date.trim(), "%Y-%m-%d").map_err(|_| {
        AppointmentError::InvalidInput("Date must use the YYYY-MM-DD format".to_string())
    })?;

    let available_slots = state.booking.available_slots(doctor_id, date)?;

    Ok(Json(AvailableSlotsResponse {
        doctor_id,
        date,
        available_slots,
    }))
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppointmentState>>,
    Extension(user): Extension<User>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    require_role(&user, &[Role::Patient])?;

    let today = Utc::now().date_naive();
    let appointment = state.booking.book(user.id, request, today)?;

    Ok((StatusCode::CREATED, Json(appointment)))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppointmentState>>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<String>,
) -> Result<Json<Appointment>, AppError> {
    let appointment_id = parse_id(&appointment_id, "appointment")?;
    let appointment = state.booking.get_for(appointment_id, &user)?;

    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn update_appointment_status(
    State(state): State<Arc<AppointmentState>>,
    Extension(user): Extension<User>,
    Path(appointment_id): Path<String>,
    Json(request): Json<StatusUpdateRequest>,
) -> Result<Json<Appointment>, AppError> {
    let appointment_id = parse_id(&appointment_id, "appointment")?;
    let new_status = request.status.parse::<AppointmentStatus>()?;
    debug!("User {} setting appointment {} to {}", user.id, appointment_id, new_status);

    let appointment = state
        .booking
        .transition_status(appointment_id, new_status, &user)?;

    Ok(Json(appointment))
}

// ==============================================================================
// DASHBOARDS
// ==============================================================================

#[axum::debug_handler]
pub async fn patient_dashboard(
    State(state): State<Arc<AppointmentState>>,
    Extension(user): Extension<User>,
) -> Result<Json<PatientDashboard>, AppError> {
    require_role(&user, &[Role::Patient])?;

    let dashboard = state.dashboards.patient(user.id, Utc::now().date_naive())?;
    Ok(Json(dashboard))
}

#[axum::debug_handler]
pub async fn doctor_dashboard(
    State(state): State<Arc<AppointmentState>>,
    Extension(user): Extension<User>,
) -> Result<Json<DoctorDashboard>, AppError> {
    require_role(&user, &[Role::Doctor])?;

    let dashboard = state.dashboards.doctor(user.id, Utc::now().date_naive())?;
    Ok(Json(dashboard))
}

#[axum::debug_handler]
pub async fn admin_dashboard(
    State(state): State<Arc<AppointmentState>>,
    Extension(user): Extension<User>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<AdminDashboard>, AppError> {
    require_role(&user, &[Role::Admin])?;

    let dashboard = state.dashboards.admin(query.search.as_deref())?;
    Ok(Json(dashboard))
}
