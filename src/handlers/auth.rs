//! Authentication handlers

use crate::models::*;
use crate::store::AuthError;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use super::AppState;

// =============================================================================
// Login / Register
// =============================================================================

/// Sign in with email and password
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> impl IntoResponse {
    match state.auth.login(&input).await {
        Ok(user) => (StatusCode::OK, Json(ApiResponse::success(user))),
        Err(e) => auth_error(e),
    }
}

/// Create a citizen account and sign in
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> impl IntoResponse {
    match state.auth.register(&input).await {
        Ok(user) => (StatusCode::CREATED, Json(ApiResponse::success(user))),
        Err(e) => auth_error(e),
    }
}

/// Sign out
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    state.auth.logout().await;
    (StatusCode::OK, Json(ApiResponse::success(())))
}

/// Get the signed-in user
pub async fn get_current_user(State(state): State<AppState>) -> impl IntoResponse {
    match state.auth.current_user().await {
        Some(user) => (StatusCode::OK, Json(ApiResponse::success(user))),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Not authenticated")),
        ),
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn auth_error<T>(err: AuthError) -> (StatusCode, Json<ApiResponse<T>>) {
    let status = match err {
        AuthError::Validation(_) => StatusCode::BAD_REQUEST,
        AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AuthError::EmailInUse => StatusCode::CONFLICT,
        AuthError::Storage(ref e) => {
            tracing::error!("Session storage failure: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(ApiResponse::error(err.to_string())))
}
