//! Dashboard and store status handlers

use crate::models::*;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use serde_json::json;

use super::AppState;

/// Aggregated statistics over the current collection
pub async fn get_dashboard_stats(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> impl IntoResponse {
    tracing::debug!("Dashboard requested by {}", user.id);
    let stats = state.issues.dashboard_stats().await;
    (StatusCode::OK, Json(ApiResponse::success(stats)))
}

/// Loading flags and last errors of both stores
pub async fn get_status(State(state): State<AppState>) -> impl IntoResponse {
    let auth = state.auth.snapshot().await;
    let status = json!({
        "issues": {
            "count": state.issues.issues().await.len(),
            "loading": state.issues.is_loading().await,
            "error": state.issues.error().await,
        },
        "auth": auth,
    });
    (StatusCode::OK, Json(ApiResponse::success(status)))
}

/// Dismiss the issue store's last error
pub async fn clear_issue_error(State(state): State<AppState>) -> impl IntoResponse {
    state.issues.clear_error().await;
    (StatusCode::OK, Json(ApiResponse::success(())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::tests::{app, json_body, login_as, send, test_state};
    use axum::http::Method;

    #[tokio::test]
    async fn test_status_reports_both_stores() {
        let state = test_state().await;
        let total = state.issues.issues().await.len();
        let app = app(state);

        let body = json_body(send(&app, Method::GET, "/api/status", None).await).await;
        assert_eq!(body["data"]["issues"]["count"], total);
        assert_eq!(body["data"]["issues"]["loading"], false);
        assert_eq!(body["data"]["auth"]["isAuthenticated"], false);

        login_as(&app, "john@example.com").await;
        let body = json_body(send(&app, Method::GET, "/api/status", None).await).await;
        assert_eq!(body["data"]["auth"]["user"]["name"], "John Citizen");

        let response = send(&app, Method::DELETE, "/api/status/error", None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_dashboard_matches_store() {
        let state = test_state().await;
        let expected = state.issues.dashboard_stats().await;
        let app = app(state);
        login_as(&app, "john@example.com").await;

        let response = send(&app, Method::GET, "/api/dashboard", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let data = &body["data"];

        assert_eq!(data["totalIssues"], expected.total_issues);
        assert_eq!(data["resolvedIssues"], expected.resolved_issues);
        assert_eq!(data["inProgressIssues"], expected.in_progress_issues);
        assert_eq!(data["issuesTrend"].as_array().unwrap().len(), 7);
        assert_eq!(
            data["topUpvotedIssues"].as_array().unwrap().len(),
            expected.top_upvoted_issues.len()
        );

        let by_category: usize = data["issuesByCategory"]
            .as_object()
            .unwrap()
            .values()
            .map(|v| v.as_u64().unwrap() as usize)
            .sum();
        assert_eq!(by_category, expected.total_issues);
    }
}
