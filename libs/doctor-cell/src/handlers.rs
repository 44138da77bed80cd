use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::{debug, info};

use shared_models::auth::{Role, User};
use shared_models::error::AppError;
use shared_utils::extractor::{parse_id, require_role};

use crate::models::{
    CreateAvailabilityRequest, CreateDoctorRequest, Doctor, DoctorSearchQuery, DoctorWithSchedule,
    WeeklyAvailability,
};
use crate::services::ScheduleProvider;
use crate::DoctorState;

// ==============================================================================
// PUBLIC HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<Arc<DoctorState>>,
    Query(query): Query<DoctorSearchQuery>,
) -> Result<Json<Value>, AppError> {
    let doctors = state.doctors.list(&query)?;

    Ok(Json(json!({
        "doctors": doctors,
        "total": doctors.len()
    })))
}

#[axum::debug_handler]
pub async fn list_specialties(
    State(state): State<Arc<DoctorState>>,
) -> Result<Json<Value>, AppError> {
    let specialties = state.doctors.specialties()?;
    Ok(Json(json!({ "specialties": specialties })))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<Arc<DoctorState>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<DoctorWithSchedule>, AppError> {
    let doctor_id = parse_id(&doctor_id, "doctor")?;

    let doctor = state.doctors.get(doctor_id)?;
    let schedule = state.schedules.weekly_availability(doctor_id)?;

    Ok(Json(DoctorWithSchedule { doctor, schedule }))
}

#[axum::debug_handler]
pub async fn get_weekly_availability(
    State(state): State<Arc<DoctorState>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Vec<WeeklyAvailability>>, AppError> {
    let doctor_id = parse_id(&doctor_id, "doctor")?;

    state.doctors.get(doctor_id)?;
    let schedule = state.schedules.weekly_availability(doctor_id)?;

    Ok(Json(schedule))
}

// ==============================================================================
// ADMIN HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<Arc<DoctorState>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateDoctorRequest>,
) -> Result<(StatusCode, Json<Doctor>), AppError> {
    require_role(&user, &[Role::Admin])?;
    debug!("Admin {} creating doctor {}", user.id, request.email);

    let doctor = state.doctors.create_doctor(&state.accounts, request)?;

    Ok((StatusCode::CREATED, Json(doctor)))
}

#[axum::debug_handler]
pub async fn create_availability(
    State(state): State<Arc<DoctorState>>,
    Extension(user): Extension<User>,
    Path(doctor_id): Path<String>,
    Json(request): Json<CreateAvailabilityRequest>,
) -> Result<(StatusCode, Json<WeeklyAvailability>), AppError> {
    require_role(&user, &[Role::Admin])?;
    let doctor_id = parse_id(&doctor_id, "doctor")?;

    state.doctors.get(doctor_id)?;
    let availability = state.schedules.create_availability(doctor_id, request)?;

    Ok((StatusCode::CREATED, Json(availability)))
}

#[axum::debug_handler]
pub async fn delete_availability(
    State(state): State<Arc<DoctorState>>,
    Extension(user): Extension<User>,
    Path(availability_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Admin])?;
    let availability_id = parse_id(&availability_id, "availability")?;

    let removed = state.schedules.remove_availability(availability_id)?;
    info!("Admin {} removed availability {}", user.id, removed.id);

    Ok(Json(json!({
        "success": true,
        "removed": removed
    })))
}
