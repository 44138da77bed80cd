use shared_config::{AppConfig, SESSION_TTL_HOURS_RANGE};
use shared_utils::jwt::issue_token;

use crate::models::{Account, AuthError, SessionResponse};

/// Fail fast when `open_session` could not succeed with this config.
pub fn ensure_sessions_available(config: &AppConfig) -> Result<(), AuthError> {
    if !config.is_configured() {
        return Err(AuthError::Session("JWT secret is not set".to_string()));
    }
    if !SESSION_TTL_HOURS_RANGE.contains(&config.session_ttl_hours) {
        return Err(AuthError::Session(format!(
            "Session lifetime of {} hours is out of range",
            config.session_ttl_hours
        )));
    }
    Ok(())
}

pub fn open_session(config: &AppConfig, account: &Account) -> Result<SessionResponse, AuthError> {
    let user = account.to_user();
    let token = issue_token(&user, &config.jwt_secret, config.session_ttl_hours)
        .map_err(AuthError::Session)?;

    Ok(SessionResponse {
        token,
        expires_in_hours: config.session_ttl_hours,
        user,
    })
}
