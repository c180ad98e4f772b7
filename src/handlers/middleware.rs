//! Middleware for session gating and security headers

use crate::handlers::AppState;
use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Signed-in user, available to gated handlers via `Extension<User>`
pub async fn require_user(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let user = match state.auth.current_user().await {
        Some(u) => u,
        None => {
            return (
                StatusCode::UNAUTHORIZED,
                axum::Json(json!({"success": false, "error": "Please log in to continue"})),
            )
                .into_response();
        }
    };

    request.extensions_mut().insert(user);
    next.run(request).await
}

/// Signed-in administrator, available via `Extension<User>`
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let user = match state.auth.current_user().await {
        Some(u) if u.is_admin() => u,
        Some(u) => {
            tracing::warn!("User {} attempted an admin action", u.id);
            return (
                StatusCode::FORBIDDEN,
                axum::Json(json!({"success": false, "error": "Administrator access required"})),
            )
                .into_response();
        }
        None => {
            return (
                StatusCode::UNAUTHORIZED,
                axum::Json(json!({"success": false, "error": "Not authenticated"})),
            )
                .into_response();
        }
    };

    request.extensions_mut().insert(user);
    next.run(request).await
}

/// Security headers middleware
pub async fn security_headers(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        "Referrer-Policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        "Content-Security-Policy",
        HeaderValue::from_static(
            "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data: https://images.pexels.com https://*.tile.openstreetmap.org; connect-src 'self'; frame-ancestors 'none'",
        ),
    );

    if state.is_production {
        headers.insert(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=63072000; includeSubDomains"),
        );
    }

    response
}
