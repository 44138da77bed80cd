use std::sync::Arc;

use axum::{
    extract::{Extension, Json, State},
    http::HeaderMap,
};
use serde_json::{json, Value};
use tracing::{debug, info};

use shared_models::auth::{TokenResponse, User};
use shared_models::error::AppError;
use shared_utils::extractor::extract_bearer_token;
use shared_utils::jwt;

use crate::models::{LoginRequest, SessionResponse};
use crate::services::open_session;
use crate::AuthState;

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<AuthState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    debug!("Login attempt");

    let account = state.accounts.authenticate(&request.email, &request.password)?;
    let session = open_session(&state.config, &account)?;

    info!("User {} logged in as {}", account.id, account.role);
    Ok(Json(session))
}

#[axum::debug_handler]
pub async fn validate_token(
    State(state): State<Arc<AuthState>>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, AppError> {
    debug!("Validating token");

    let token = extract_bearer_token(&headers)?;
    let user = jwt::validate_token(&token, &state.config.jwt_secret).map_err(AppError::Auth)?;

    Ok(Json(TokenResponse {
        valid: true,
        user_id: user.id,
        email: user.email,
        role: user.role,
    }))
}

#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<Arc<AuthState>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    debug!("Getting profile for user: {}", user.id);

    let account = state.accounts.find_by_id(user.id)?;

    Ok(Json(json!({
        "user_id": account.id,
        "account": account
    })))
}
