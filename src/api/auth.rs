use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use utoipa::ToSchema;

use crate::auth::{CurrentUser, create_jwt, verify_password};
use crate::domain::DomainError;
use crate::infrastructure::AppState;

const INVALID_CREDENTIALS: &str = "Invalid credentials.";

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    username: String,
    password: String,
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Bearer token issued"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Value>, DomainError> {
    tracing::info!("Login attempt for user: {}", payload.username);

    let Some(user) = state.user_repo.find_by_username(&payload.username).await? else {
        tracing::warn!("User not found: {}", payload.username);
        return Err(DomainError::Unauthenticated(INVALID_CREDENTIALS.to_string()));
    };

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {
            tracing::info!("Password verified successfully for user: {}", user.username);
            let token = create_jwt(&user.username).map_err(DomainError::Internal)?;
            Ok(Json(json!({ "token": token })))
        }
        _ => {
            tracing::warn!("Password verification failed for user: {}", user.username);
            Err(DomainError::Unauthenticated(INVALID_CREDENTIALS.to_string()))
        }
    }
}

#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "The authenticated user"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_me(user: CurrentUser) -> Json<Value> {
    let user = user.0;
    Json(json!({
        "id": user.id,
        "username": user.username,
        "first_name": user.first_name,
        "last_name": user.last_name,
        "is_staff": user.is_staff,
    }))
}
