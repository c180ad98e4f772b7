//! Issue handlers for the map, list and detail views

use crate::models::*;
use crate::store::{IssueFilter, Proximity, StoreError, TimeRange};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use std::str::FromStr;

use super::AppState;

// =============================================================================
// Query Parameters
// =============================================================================

/// Filters for the map and list views.
///
/// `category` and `status` take comma-separated wire names; `lat`, `lng` and
/// `radius_km` must be given together.
#[derive(Debug, Default, Deserialize)]
pub struct ListIssuesQuery {
    pub category: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
    pub time_range: Option<TimeRange>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius_km: Option<f64>,
}

impl ListIssuesQuery {
    pub fn to_filter(&self) -> Result<IssueFilter, String> {
        let proximity = match (self.lat, self.lng, self.radius_km) {
            (Some(lat), Some(lng), Some(radius_km)) if radius_km >= 0.0 => {
                Some(Proximity { lat, lng, radius_km })
            }
            (None, None, None) => None,
            _ => {
                return Err(
                    "lat, lng and a non-negative radius_km must be given together".to_string(),
                )
            }
        };

        let categories = parse_list::<IssueCategory>(self.category.as_deref())
            .map_err(|e| e.to_string())?;
        let statuses =
            parse_list::<IssueStatus>(self.status.as_deref()).map_err(|e| e.to_string())?;

        Ok(IssueFilter {
            categories,
            statuses,
            search: self.search.clone(),
            time_range: self.time_range.unwrap_or_default(),
            proximity,
        })
    }
}

fn parse_list<T: FromStr>(raw: Option<&str>) -> Result<Vec<T>, T::Err> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(T::from_str)
        .collect()
}

// =============================================================================
// Read Endpoints
// =============================================================================

/// List issues matching the view's filters
pub async fn list_issues(
    State(state): State<AppState>,
    Query(query): Query<ListIssuesQuery>,
) -> impl IntoResponse {
    let filter = match query.to_filter() {
        Ok(f) => f,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::<Vec<Issue>>::error(e)),
            )
        }
    };

    let issues = state.issues.filter_issues(&filter).await;
    (StatusCode::OK, Json(ApiResponse::success(issues)))
}

/// Reload the collection from the data source
pub async fn refresh_issues(State(state): State<AppState>) -> impl IntoResponse {
    match state.issues.fetch_issues().await {
        Ok(count) => (
            StatusCode::OK,
            Json(ApiResponse::success(serde_json::json!({ "loaded": count }))),
        ),
        Err(e) => store_error(e),
    }
}

/// Get issue by id
pub async fn get_issue(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.issues.get_issue_by_id(&id).await {
        Some(issue) => (StatusCode::OK, Json(ApiResponse::success(issue))),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Issue not found")),
        ),
    }
}

/// Category lookup table
pub async fn list_categories() -> impl IntoResponse {
    let options: Vec<EnumOption> = IssueCategory::ALL.into_iter().map(EnumOption::from).collect();
    Json(ApiResponse::success(options))
}

/// Status lookup table
pub async fn list_statuses() -> impl IntoResponse {
    let options: Vec<EnumOption> = IssueStatus::ALL.into_iter().map(EnumOption::from).collect();
    Json(ApiResponse::success(options))
}

// =============================================================================
// Write Endpoints
// =============================================================================

/// Report a new issue
pub async fn create_issue(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(input): Json<CreateIssue>,
) -> impl IntoResponse {
    match state.issues.add_issue(input, &user).await {
        Ok(issue) => (StatusCode::CREATED, Json(ApiResponse::success(issue))),
        Err(e) => store_error(e),
    }
}

/// Toggle the session's upvote
pub async fn upvote_issue(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.issues.upvote_issue(&id).await {
        Ok(issue) => (StatusCode::OK, Json(ApiResponse::success(issue))),
        Err(e) => store_error(e),
    }
}

/// Add a comment to an issue
pub async fn add_comment(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
    Json(input): Json<CreateComment>,
) -> impl IntoResponse {
    match state.issues.add_comment(&id, &input.content, &user).await {
        Ok(comment) => (StatusCode::CREATED, Json(ApiResponse::success(comment))),
        Err(e) => store_error(e),
    }
}

/// Update issue status (admin)
pub async fn update_issue_status(
    State(state): State<AppState>,
    Extension(admin): Extension<User>,
    Path(id): Path<String>,
    Json(input): Json<UpdateStatusRequest>,
) -> impl IntoResponse {
    match state.issues.set_issue_status(&id, input.status).await {
        Ok(issue) => {
            tracing::info!(
                "Admin {} changed issue {} status to {}",
                admin.email,
                id,
                input.status
            );
            (StatusCode::OK, Json(ApiResponse::success(issue)))
        }
        Err(e) => store_error(e),
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn store_error<T>(err: StoreError) -> (StatusCode, Json<ApiResponse<T>>) {
    let status = match err {
        StoreError::Validation(_) => StatusCode::BAD_REQUEST,
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::LoadFailed(_) | StoreError::WriteFailed(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(ApiResponse::error(err.to_string())))
}
