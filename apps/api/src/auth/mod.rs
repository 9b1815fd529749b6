//! Authentication gate.
//!
//! The provider is a collaborator behind a trait; the shipped implementation
//! is an in-memory mock. The resume API only needs to know whether someone
//! is signed in: there is one shared document no matter who that is.

pub mod handlers;
pub mod validation;

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Auth provider unavailable: {0}")]
    Unavailable(String),
}

/// Login/registration collaborator. `Ok(false)` is an ordinary rejection;
/// `Err` means the provider itself failed.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<bool, AuthError>;
    async fn register(&self, name: &str, email: &str, password: &str) -> Result<bool, AuthError>;
    async fn logout(&self);
    async fn current_user(&self) -> Option<User>;
}

struct Account {
    user: User,
    password: String,
}

/// In-memory provider. Accounts live for the lifetime of the process and
/// there is a single session slot, like a browser tab.
#[derive(Default)]
pub struct MockAuthProvider {
    accounts: RwLock<HashMap<String, Account>>,
    session: RwLock<Option<User>>,
}

impl MockAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn set_session(&self, user: Option<User>) {
        *self.session.write().unwrap_or_else(|e| e.into_inner()) = user;
    }
}

#[async_trait]
impl AuthProvider for MockAuthProvider {
    async fn login(&self, email: &str, password: &str) -> Result<bool, AuthError> {
        let user = {
            let accounts = self.accounts.read().unwrap_or_else(|e| e.into_inner());
            accounts
                .get(email.trim())
                .filter(|a| a.password == password)
                .map(|a| a.user.clone())
        };
        match user {
            Some(user) => {
                info!("User {} signed in", user.id);
                self.set_session(Some(user));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn register(&self, name: &str, email: &str, password: &str) -> Result<bool, AuthError> {
        let email = email.trim().to_string();
        let user = {
            let mut accounts = self.accounts.write().unwrap_or_else(|e| e.into_inner());
            if accounts.contains_key(&email) {
                return Ok(false);
            }
            let user = User {
                id: Uuid::new_v4(),
                name: name.trim().to_string(),
                email: email.clone(),
                created_at: Utc::now(),
            };
            accounts.insert(
                email,
                Account {
                    user: user.clone(),
                    password: password.to_string(),
                },
            );
            user
        };
        info!("Registered user {}", user.id);
        self.set_session(Some(user));
        Ok(true)
    }

    async fn logout(&self) {
        self.set_session(None);
    }

    async fn current_user(&self) -> Option<User> {
        self.session
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

/// Middleware: rejects the request with 401 unless someone is signed in.
pub async fn require_session(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if state.auth.current_user().await.is_none() {
        return Err(AppError::Unauthorized);
    }
    Ok(next.run(request).await)
}
