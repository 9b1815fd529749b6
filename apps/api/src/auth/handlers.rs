use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::auth::validation::{validate_login, validate_register};
use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: Option<User>,
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let errors = validate_login(&req.email, &req.password);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let accepted = state
        .auth
        .login(&req.email, &req.password)
        .await
        .map_err(|e| {
            warn!("Login failed unexpectedly: {e}");
            AppError::Internal(e.into())
        })?;
    if !accepted {
        return Err(AppError::AuthFailed("Invalid email or password".to_string()));
    }

    Ok(Json(SessionResponse {
        user: state.auth.current_user().await,
    }))
}

/// POST /api/v1/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let errors = validate_register(&req.name, &req.email, &req.password, &req.confirm_password);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let created = state
        .auth
        .register(&req.name, &req.email, &req.password)
        .await
        .map_err(|e| {
            warn!("Registration failed unexpectedly: {e}");
            AppError::Internal(e.into())
        })?;
    if !created {
        return Err(AppError::AuthFailed("Email already exists".to_string()));
    }

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            user: state.auth.current_user().await,
        }),
    ))
}

/// POST /api/v1/auth/logout
pub async fn handle_logout(State(state): State<AppState>) -> StatusCode {
    state.auth.logout().await;
    StatusCode::NO_CONTENT
}

/// GET /api/v1/auth/me
pub async fn handle_me(State(state): State<AppState>) -> Json<SessionResponse> {
    Json(SessionResponse {
        user: state.auth.current_user().await,
    })
}
