use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_utils::extractor::auth_middleware;

use crate::handlers::*;
use crate::PatientState;

pub fn patient_routes(state: Arc<PatientState>) -> Router {
    let public_routes = Router::new().route("/register", post(register_patient));

    let protected_routes = Router::new()
        .route("/", get(list_patients))
        .route("/{patient_id}", get(get_patient))
        .layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
