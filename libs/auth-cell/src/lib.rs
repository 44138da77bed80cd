use std::sync::Arc;

use shared_config::AppConfig;

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{Account, AuthError, NewAccount, SessionResponse};
pub use services::{ensure_sessions_available, open_session, AccountDirectory};

#[derive(Clone)]
pub struct AuthState {
    pub config: Arc<AppConfig>,
    pub accounts: Arc<AccountDirectory>,
}

impl AuthState {
    pub fn new(config: Arc<AppConfig>, accounts: Arc<AccountDirectory>) -> Self {
        Self { config, accounts }
    }
}
