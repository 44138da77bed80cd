use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use shared_utils::extractor::auth_middleware;

use crate::handlers;
use crate::AppointmentState;

pub fn appointment_routes(state: Arc<AppointmentState>) -> Router {
    let public_routes = Router::new().route(
        "/doctors/{doctor_id}/available-slots",
        get(handlers::get_available_slots),
    );

    let protected_routes = Router::new()
        .route("/", post(handlers::book_appointment))
        .route("/{appointment_id}", get(handlers::get_appointment))
        .route("/{appointment_id}/status", patch(handlers::update_appointment_status))
        .route("/dashboard/patient", get(handlers::patient_dashboard))
        .route("/dashboard/doctor", get(handlers::doctor_dashboard))
        .route("/dashboard/admin", get(handlers::admin_dashboard))
        .layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
