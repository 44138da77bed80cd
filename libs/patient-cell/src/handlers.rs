use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::info;

use auth_cell::{ensure_sessions_available, open_session};
use shared_models::auth::{Role, User};
use shared_models::error::AppError;
use shared_utils::extractor::{parse_id, require_role};

use crate::models::{Patient, PatientRegistration, PatientSearchQuery, RegisterPatientRequest};
use crate::PatientState;

#[axum::debug_handler]
pub async fn register_patient(
    State(state): State<Arc<PatientState>>,
    Json(request): Json<RegisterPatientRequest>,
) -> Result<(StatusCode, Json<PatientRegistration>), AppError> {
    // Nothing is stored unless a session can be issued afterwards
    ensure_sessions_available(&state.config)?;

    let today = Utc::now().date_naive();
    let (account, patient) = state.patients.register(&state.accounts, request, today)?;
    let session = open_session(&state.config, &account)?;

    info!("Patient {} registered", patient.id);
    Ok((StatusCode::CREATED, Json(PatientRegistration { patient, session })))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<Arc<PatientState>>,
    Extension(user): Extension<User>,
    Path(patient_id): Path<String>,
) -> Result<Json<Patient>, AppError> {
    let patient_id = parse_id(&patient_id, "patient")?;
    let patient = state.patients.get_for(patient_id, &user)?;

    Ok(Json(patient))
}

#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<Arc<PatientState>>,
    Extension(user): Extension<User>,
    Query(query): Query<PatientSearchQuery>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Admin])?;

    let patients = state.patients.list(query.search.as_deref())?;

    Ok(Json(json!({
        "patients": patients,
        "total": patients.len()
    })))
}
