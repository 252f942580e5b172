use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::{
    requests::{LoginRequest, RegisterRequest},
    responses::{AuthResponse, UserResponse},
};
use crate::domain::models::user::User;
use crate::error::AppError;
use std::sync::Arc;
use argon2::{password_hash::{PasswordHash, PasswordHasher, SaltString}, Argon2, PasswordVerifier};
use rand::rngs::OsRng;
use tracing::info;

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.username.trim().is_empty()
        || payload.email.trim().is_empty()
        || payload.password.is_empty()
    {
        return Err(AppError::Validation("Missing fields".into()));
    }

    if state.user_repo.find_by_email(&payload.email).await?.is_some() {
        return Err(AppError::Conflict("Email is already registered.".into()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(payload.password.as_bytes(), &salt)
        .map_err(|_| AppError::Internal)?
        .to_string();

    let user = User::new(payload.username, payload.email, password_hash);
    let created = state.user_repo.create(&user).await?;

    info!("User registered: {}", created.id);

    Ok((StatusCode::CREATED, Json(UserResponse::from(created))))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_repo.find_by_email(&payload.email).await?
        .ok_or(AppError::Unauthorized)?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal)?;

    Argon2::default().verify_password(payload.password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::Unauthorized)?;

    let token = state.auth_service.issue_token(&user)?;

    info!("User logged in: {}", user.id);

    Ok(Json(AuthResponse {
        token,
        user: UserResponse::from(user),
    }))
}
