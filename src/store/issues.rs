//! Issue store
//!
//! Owns the session's issue collection. Every write goes through a method
//! that awaits the configured latency, then applies the change under the
//! state lock and returns the updated record.

use super::filter::{filter_issues, IssueFilter};
use super::stats::dashboard_stats;
use crate::db::{IssueSource, SeedIssueSource, SourceError};
use crate::models::{
    Comment, CreateIssue, DashboardStats, Issue, IssueCategory, IssueStatus, User,
};
use crate::validation::{validate_comment, validate_create_issue, ValidationError};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// Simulated round-trip time for each kind of store call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    pub fetch: Duration,
    pub write: Duration,
    pub upvote: Duration,
    pub comment: Duration,
}

impl Latency {
    pub fn none() -> Self {
        Self {
            fetch: Duration::ZERO,
            write: Duration::ZERO,
            upvote: Duration::ZERO,
            comment: Duration::ZERO,
        }
    }
}

impl Default for Latency {
    fn default() -> Self {
        Self {
            fetch: Duration::from_millis(800),
            write: Duration::from_millis(1000),
            upvote: Duration::from_millis(300),
            comment: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to fetch issues")]
    LoadFailed(#[source] SourceError),

    #[error("Failed to add issue")]
    WriteFailed(#[source] SourceError),

    #[error("Issue not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Observable store state
#[derive(Debug, Clone, Default, Serialize)]
pub struct IssueState {
    pub issues: Vec<Issue>,
    pub loading: bool,
    pub error: Option<String>,
}

pub struct IssueStore<S = SeedIssueSource> {
    source: S,
    latency: Latency,
    state: RwLock<IssueState>,
    /// Per-issue FIFO locks serializing mutations on the same id
    issue_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<S: IssueSource> IssueStore<S> {
    pub fn new(source: S, latency: Latency) -> Self {
        Self {
            source,
            latency,
            state: RwLock::new(IssueState::default()),
            issue_locks: Mutex::new(HashMap::new()),
        }
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Replace the collection with the source snapshot.
    ///
    /// On failure the previous collection stays in place and the error is
    /// recorded.
    pub async fn fetch_issues(&self) -> Result<usize, StoreError> {
        {
            let mut state = self.state.write().await;
            state.loading = true;
            state.error = None;
        }

        tokio::time::sleep(self.latency.fetch).await;
        let loaded = self.source.load().await;

        let mut state = self.state.write().await;
        state.loading = false;
        match loaded {
            Ok(issues) => {
                let count = issues.len();
                state.issues = issues;
                tracing::info!("Loaded {} issues", count);
                Ok(count)
            }
            Err(e) => {
                tracing::error!("Failed to fetch issues: {}", e);
                let err = StoreError::LoadFailed(e);
                state.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub async fn get_issue_by_id(&self, id: &str) -> Option<Issue> {
        self.state
            .read()
            .await
            .issues
            .iter()
            .find(|issue| issue.id == id)
            .cloned()
    }

    pub async fn issues(&self) -> Vec<Issue> {
        self.state.read().await.issues.clone()
    }

    pub async fn snapshot(&self) -> IssueState {
        self.state.read().await.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    pub async fn clear_error(&self) {
        self.state.write().await.error = None;
    }

    pub async fn filter_issues_by_category(&self, categories: &[IssueCategory]) -> Vec<Issue> {
        self.filter_issues(&IssueFilter::categories(categories)).await
    }

    pub async fn filter_issues_by_status(&self, statuses: &[IssueStatus]) -> Vec<Issue> {
        self.filter_issues(&IssueFilter::statuses(statuses)).await
    }

    pub async fn filter_issues(&self, filter: &IssueFilter) -> Vec<Issue> {
        filter_issues(&self.state.read().await.issues, filter, Utc::now())
    }

    pub async fn dashboard_stats(&self) -> DashboardStats {
        dashboard_stats(&self.state.read().await.issues, Utc::now().date_naive())
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Create a report from the submitted form and append it
    pub async fn add_issue(&self, input: CreateIssue, reporter: &User) -> Result<Issue, StoreError> {
        if let Err(e) = validate_create_issue(&input) {
            return Err(self.record(StoreError::Validation(e)).await);
        }

        {
            let mut state = self.state.write().await;
            state.loading = true;
            state.error = None;
        }

        tokio::time::sleep(self.latency.write).await;

        let now = Utc::now();
        let issue = Issue {
            id: format!("issue_{}", Uuid::new_v4().simple()),
            title: input.title.trim().to_string(),
            description: input.description.trim().to_string(),
            category: input.category,
            status: IssueStatus::Reported,
            location: input.location,
            photos: vec![],
            reported_by: reporter.id.clone(),
            reported_at: now,
            updated_at: now,
            upvotes: 0,
            comments: vec![],
            has_upvoted: false,
        };

        let submitted = self.source.submit(&issue).await;

        let mut state = self.state.write().await;
        state.loading = false;
        if let Err(e) = submitted {
            tracing::error!("Failed to add issue: {}", e);
            let err = StoreError::WriteFailed(e);
            state.error = Some(err.to_string());
            return Err(err);
        }
        state.issues.push(issue.clone());

        tracing::info!(
            "User {} reported issue {} ({})",
            reporter.id,
            issue.id,
            issue.category
        );

        Ok(issue)
    }

    /// Flip this session's upvote on an issue
    pub async fn upvote_issue(&self, id: &str) -> Result<Issue, StoreError> {
        self.mutate(id, self.latency.upvote, |issue| {
            if issue.has_upvoted {
                issue.upvotes = issue.upvotes.saturating_sub(1);
            } else {
                issue.upvotes += 1;
            }
            issue.has_upvoted = !issue.has_upvoted;
            tracing::debug!(
                "Issue {} upvoted={} ({} votes)",
                issue.id,
                issue.has_upvoted,
                issue.upvotes
            );
            issue.clone()
        })
        .await
    }

    /// Append a comment by `author`; blank content is rejected before any change
    pub async fn add_comment(
        &self,
        id: &str,
        content: &str,
        author: &User,
    ) -> Result<Comment, StoreError> {
        if let Err(e) = validate_comment(content) {
            return Err(self.record(StoreError::Validation(e)).await);
        }

        let comment = Comment {
            id: format!("comment_{}", Uuid::new_v4().simple()),
            issue_id: id.to_string(),
            user_id: author.id.clone(),
            user_name: author.name.clone(),
            user_avatar: author.avatar.clone(),
            content: content.trim().to_string(),
            created_at: Utc::now(),
        };

        self.mutate(id, self.latency.comment, move |issue| {
            issue.comments.push(comment.clone());
            comment
        })
        .await
    }

    /// Set an issue's status; any status may follow any other
    pub async fn set_issue_status(&self, id: &str, status: IssueStatus) -> Result<Issue, StoreError> {
        self.mutate(id, self.latency.write, |issue| {
            tracing::info!("Issue {} status {} -> {}", issue.id, issue.status, status);
            issue.status = status;
            issue.clone()
        })
        .await
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Apply `apply` to issue `id` after `delay`, holding that issue's lock
    /// for the whole call. Advances `updated_at` on success.
    async fn mutate<T>(
        &self,
        id: &str,
        delay: Duration,
        apply: impl FnOnce(&mut Issue) -> T,
    ) -> Result<T, StoreError> {
        let lock = self.issue_lock(id).await;
        let result = {
            let _guard = lock.lock().await;
            tokio::time::sleep(delay).await;
            self.apply_to(id, apply).await
        };
        self.release_lock(id, lock).await;
        result
    }

    async fn apply_to<T>(
        &self,
        id: &str,
        apply: impl FnOnce(&mut Issue) -> T,
    ) -> Result<T, StoreError> {
        let mut state = self.state.write().await;
        match state.issues.iter_mut().find(|issue| issue.id == id) {
            Some(issue) => {
                issue.updated_at = Utc::now();
                Ok(apply(issue))
            }
            None => {
                let err = StoreError::NotFound(id.to_string());
                tracing::warn!("{}", err);
                state.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    async fn issue_lock(&self, id: &str) -> Arc<Mutex<()>> {
        self.issue_locks
            .lock()
            .await
            .entry(id.to_string())
            .or_default()
            .clone()
    }

    /// Drop the map entry once no other caller holds or waits on it
    async fn release_lock(&self, id: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.issue_locks.lock().await;
        // One reference in the map, one here
        if Arc::strong_count(&lock) == 2 {
            locks.remove(id);
        }
    }

    async fn record(&self, err: StoreError) -> StoreError {
        tracing::warn!("{}", err);
        self.state.write().await.error = Some(err.to_string());
        err
    }
}
