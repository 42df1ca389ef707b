use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::{hash_password, issue_token, verify_password};
use crate::config::SecurityConfig;
use crate::database::models::{normalize_email, PublicUser, User, ValidationError};
use crate::database::Store;

use super::ServiceError;

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Token plus public projection, returned by register and login
#[derive(Debug, Serialize)]
pub struct AuthSession {
    pub token: String,
    pub user: PublicUser,
}

const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub struct AccountService {
    store: Arc<dyn Store>,
    security: SecurityConfig,
}

impl AccountService {
    pub fn new(store: Arc<dyn Store>, security: &SecurityConfig) -> Self {
        Self {
            store,
            security: security.clone(),
        }
    }

    /// Create a regular account with an empty progress record and sign it in.
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthSession, ServiceError> {
        let (name, email, password) = match (
            non_blank(request.name),
            non_blank(request.email),
            request.password.filter(|p| !p.is_empty()),
        ) {
            (Some(name), Some(email), Some(password)) => (name, email, password),
            _ => return Err(ValidationError::new("All fields are required").into()),
        };

        let min = self.security.min_password_length;
        if password.chars().count() < min {
            return Err(ValidationError::new(format!(
                "Password must be at least {} characters",
                min
            ))
            .into());
        }

        if self.store.find_user_by_email(&normalize_email(&email)).await?.is_some() {
            return Err(ValidationError::new("Email already registered").into());
        }

        let hash = hash_password(&password, self.security.bcrypt_cost).await?;
        let user = User::new(&name, &email, hash, false);
        self.store.insert_user(&user).await?;
        self.store.get_or_create_progress(user.id).await?;

        tracing::info!("Registered user {}", user.email);
        self.session_for(&user)
    }

    /// Missing accounts and wrong passwords fail identically.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthSession, ServiceError> {
        let email = non_blank(request.email).map(|e| normalize_email(&e));
        let password = request.password.unwrap_or_default();

        let user = match email {
            Some(email) => self.store.find_user_by_email(&email).await?,
            None => None,
        };

        let Some(mut user) = user else {
            tracing::warn!("Login failed: unknown account");
            return Err(ValidationError::new(INVALID_CREDENTIALS).into());
        };

        if !verify_password(&password, &user.password_hash).await? {
            tracing::warn!("Login failed: wrong password for {}", user.email);
            return Err(ValidationError::new(INVALID_CREDENTIALS).into());
        }

        let now = Utc::now();
        self.store.record_login(user.id, now).await?;
        user.last_login = Some(now);

        self.session_for(&user)
    }

    fn session_for(&self, user: &User) -> Result<AuthSession, ServiceError> {
        Ok(AuthSession {
            token: issue_token(user.id, &self.security)?,
            user: PublicUser::from(user),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
