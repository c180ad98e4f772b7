//! Data models for the application

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Enums
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCategory {
    Roads,
    Lighting,
    Trash,
    Water,
    Electricity,
    Safety,
    Noise,
    Other,
}

impl IssueCategory {
    pub const ALL: [IssueCategory; 8] = [
        IssueCategory::Roads,
        IssueCategory::Lighting,
        IssueCategory::Trash,
        IssueCategory::Water,
        IssueCategory::Electricity,
        IssueCategory::Safety,
        IssueCategory::Noise,
        IssueCategory::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IssueCategory::Roads => "roads",
            IssueCategory::Lighting => "lighting",
            IssueCategory::Trash => "trash",
            IssueCategory::Water => "water",
            IssueCategory::Electricity => "electricity",
            IssueCategory::Safety => "safety",
            IssueCategory::Noise => "noise",
            IssueCategory::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            IssueCategory::Roads => "Roads & Sidewalks",
            IssueCategory::Lighting => "Street Lighting",
            IssueCategory::Trash => "Trash & Sanitation",
            IssueCategory::Water => "Water Services",
            IssueCategory::Electricity => "Electricity",
            IssueCategory::Safety => "Public Safety",
            IssueCategory::Noise => "Noise Complaint",
            IssueCategory::Other => "Other",
        }
    }

    /// Marker color shared by the map pins, chart slices and filter chips.
    pub fn color(self) -> &'static str {
        match self {
            IssueCategory::Roads => "#ef4444",
            IssueCategory::Lighting => "#f59e0b",
            IssueCategory::Trash => "#6366f1",
            IssueCategory::Water => "#06b6d4",
            IssueCategory::Electricity => "#f97316",
            IssueCategory::Safety => "#b91c1c",
            IssueCategory::Noise => "#8b5cf6",
            IssueCategory::Other => "#6b7280",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    Reported,
    UnderReview,
    InProgress,
    Resolved,
    Closed,
}

impl IssueStatus {
    pub const ALL: [IssueStatus; 5] = [
        IssueStatus::Reported,
        IssueStatus::UnderReview,
        IssueStatus::InProgress,
        IssueStatus::Resolved,
        IssueStatus::Closed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IssueStatus::Reported => "reported",
            IssueStatus::UnderReview => "under_review",
            IssueStatus::InProgress => "in_progress",
            IssueStatus::Resolved => "resolved",
            IssueStatus::Closed => "closed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            IssueStatus::Reported => "Reported",
            IssueStatus::UnderReview => "Under Review",
            IssueStatus::InProgress => "In Progress",
            IssueStatus::Resolved => "Resolved",
            IssueStatus::Closed => "Closed",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            IssueStatus::Reported => "#fef08a",
            IssueStatus::UnderReview => "#bfdbfe",
            IssueStatus::InProgress => "#c7d2fe",
            IssueStatus::Resolved => "#bbf7d0",
            IssueStatus::Closed => "#e5e7eb",
        }
    }
}

/// Error returned when a wire name matches no enumeration value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind} '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for IssueCategory {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IssueCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "category",
                value: s.to_string(),
            })
    }
}

impl FromStr for IssueStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IssueStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "status",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Citizen,
    Admin,
}

// =============================================================================
// Issue
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: IssueCategory,
    pub status: IssueStatus,
    pub location: Location,
    pub photos: Vec<String>,
    pub reported_by: String,
    pub reported_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub upvotes: u32,
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub has_upvoted: bool,
}

/// Fields submitted by the report form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateIssue {
    pub title: String,
    pub description: String,
    pub category: IssueCategory,
    pub location: Location,
    /// Accepted for compatibility with the form; uploads are not stored.
    #[serde(default)]
    pub photos: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: IssueStatus,
}

// =============================================================================
// Comment
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub issue_id: String,
    pub user_id: String,
    pub user_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_avatar: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateComment {
    pub content: String,
}

// =============================================================================
// User
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

// =============================================================================
// Dashboard
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub reported: usize,
    pub resolved: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_issues: usize,
    pub resolved_issues: usize,
    pub in_progress_issues: usize,
    pub issues_by_category: std::collections::BTreeMap<IssueCategory, usize>,
    pub issues_by_status: std::collections::BTreeMap<IssueStatus, usize>,
    pub issues_trend: Vec<TrendPoint>,
    pub top_upvoted_issues: Vec<Issue>,
}

/// One row of an enumeration lookup table
#[derive(Debug, Clone, Serialize)]
pub struct EnumOption {
    pub value: &'static str,
    pub label: &'static str,
    pub color: &'static str,
}

impl From<IssueCategory> for EnumOption {
    fn from(category: IssueCategory) -> Self {
        Self {
            value: category.as_str(),
            label: category.label(),
            color: category.color(),
        }
    }
}

impl From<IssueStatus> for EnumOption {
    fn from(status: IssueStatus) -> Self {
        Self {
            value: status.as_str(),
            label: status.label(),
            color: status.color(),
        }
    }
}

// =============================================================================
// API Responses
// =============================================================================

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}
