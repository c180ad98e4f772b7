//! HTTP request handlers

pub mod auth;
pub mod dashboard;
pub mod issues;
pub mod middleware;

pub use auth::*;
pub use dashboard::*;
pub use issues::*;

use crate::store::{AuthStore, IssueStore};
use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub issues: Arc<IssueStore>,
    pub auth: Arc<AuthStore>,
    pub is_production: bool,
}

/// Build the `/api` routes.
///
/// Reporting, upvoting, commenting and the dashboard need a signed-in user;
/// status changes need an administrator.
pub fn api_routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/issues", get(list_issues))
        .route("/issues/refresh", post(refresh_issues))
        .route("/issues/:id", get(get_issue))
        .route("/categories", get(list_categories))
        .route("/statuses", get(list_statuses))
        .route("/status", get(get_status))
        .route("/status/error", delete(clear_issue_error))
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(get_current_user));

    let citizen = Router::new()
        .route("/issues", post(create_issue))
        .route("/issues/:id/upvote", post(upvote_issue))
        .route("/issues/:id/comments", post(add_comment))
        .route("/dashboard", get(get_dashboard_stats))
        .route_layer(from_fn_with_state(state.clone(), middleware::require_user));

    let admin = Router::new()
        .route("/issues/:id/status", put(update_issue_status))
        .route_layer(from_fn_with_state(state, middleware::require_admin));

    public.merge(citizen).merge(admin)
}
