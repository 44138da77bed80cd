use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use shared_models::auth::Role;

use crate::models::{Account, AuthError, NewAccount, MIN_PASSWORD_LENGTH};
use crate::services::password::{hash_password, verify_password};

/// In-memory account directory shared by every cell that creates or looks up users.
#[derive(Debug, Default)]
pub struct AccountDirectory {
    accounts: RwLock<Vec<Account>>,
}

impl AccountDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(skip(self, request), fields(email = %request.email, role = %request.role))]
    pub fn register(&self, request: NewAccount) -> Result<Account, AuthError> {
        // Validate input
        let name = request.name.trim();
        let email = normalize_email(&request.email);

        if name.is_empty() {
            return Err(AuthError::InvalidInput("Name is required".to_string()));
        }
        if email.is_empty() || !email.contains('@') {
            return Err(AuthError::InvalidInput("A valid email is required".to_string()));
        }
        if request.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::InvalidInput(format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LENGTH
            )));
        }

        // Hash outside the write lock.
        let password_hash = hash_password(&request.password)?;

        // Email must be unique
        let mut accounts = self.write()?;
        if accounts.iter().any(|account| account.email == email) {
            warn!("Registration rejected, email already in use");
            return Err(AuthError::EmailTaken(email));
        }

        let account = Account {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email,
            password_hash,
            role: request.role,
            created_at: Utc::now(),
        };
        accounts.push(account.clone());

        info!("Registered {} account {}", account.role, account.id);
        Ok(account)
    }

    #[instrument(skip(self, password))]
    pub fn authenticate(&self, email: &str, password: &str) -> Result<Account, AuthError> {
        let email = normalize_email(email);
        let account = self
            .read()?
            .iter()
            .find(|account| account.email == email)
            .cloned();

        let Some(account) = account else {
            debug!("No account for email");
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password, &account.password_hash)? {
            warn!("Password mismatch for account {}", account.id);
            return Err(AuthError::InvalidCredentials);
        }

        Ok(account)
    }

    pub fn find_by_id(&self, id: Uuid) -> Result<Account, AuthError> {
        self.read()?
            .iter()
            .find(|account| account.id == id)
            .cloned()
            .ok_or(AuthError::NotFound)
    }

    pub fn list_by_role(&self, role: Role) -> Result<Vec<Account>, AuthError> {
        Ok(self
            .read()?
            .iter()
            .filter(|account| account.role == role)
            .cloned()
            .collect())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Account>>, AuthError> {
        self.accounts
            .read()
            .map_err(|_| AuthError::Store("account directory lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Account>>, AuthError> {
        self.accounts
            .write()
            .map_err(|_| AuthError::Store("account directory lock poisoned".to_string()))
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
