// src/handlers/auth.rs

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::user::{CreateUserRequest, LoginRequest},
    quiz::session::SessionStore,
    repo::{RegisterOutcome, UserRepo},
    utils::jwt::{Claims, sign_jwt},
};

/// Registers a new user.
///
/// Hashes the password using Argon2 before storing it.
/// Returns 201 Created, or 409 Conflict when the username is taken.
pub async fn register(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    match UserRepo::new(pool)
        .register(&payload.username, &payload.password)
        .await?
    {
        RegisterOutcome::Created => {
            tracing::info!("Registered user {}", payload.username);
            Ok((
                StatusCode::CREATED,
                Json(json!({ "username": payload.username })),
            ))
        }
        RegisterOutcome::AlreadyExists => Err(AppError::Conflict(format!(
            "Username '{}' already exists",
            payload.username
        ))),
    }
}

/// Authenticates a user and returns a JWT token.
pub async fn login(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let is_valid = UserRepo::new(pool)
        .authenticate(&payload.username, &payload.password)
        .await?;

    if !is_valid {
        tracing::debug!("Rejected login for {}", payload.username);
        return Err(AppError::AuthError(
            "Invalid username or password".to_string(),
        ));
    }

    let token = sign_jwt(&payload.username, &config.jwt_secret, config.jwt_expiration)?;

    Ok(Json(json!({
        "token": token,
        "type": "Bearer",
        "username": payload.username
    })))
}

/// Drops the caller's quiz sessions. The client discards its token.
pub async fn logout(
    State(sessions): State<SessionStore>,
    Extension(claims): Extension<Claims>,
) -> StatusCode {
    sessions.clear(&claims.sub).await;
    StatusCode::NO_CONTENT
}
