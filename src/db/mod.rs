//! Issue data source
//!
//! The issue store loads its collection through [`IssueSource`]. The default
//! source generates the demo dataset in memory; a networked client can be
//! substituted without touching the store.

mod seed;

pub use seed::SeedIssueSource;

use crate::models::Issue;
use std::future::Future;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Data source unavailable: {0}")]
    Unavailable(String),
    #[error("Data source rejected write: {0}")]
    Rejected(String),
}

/// Supplies the full issue collection and accepts new reports
pub trait IssueSource: Send + Sync + 'static {
    /// Load the whole collection, or fail without partial data
    fn load(&self) -> impl Future<Output = Result<Vec<Issue>, SourceError>> + Send;

    /// Forward a newly created issue upstream before it becomes visible locally
    fn submit(&self, _issue: &Issue) -> impl Future<Output = Result<(), SourceError>> + Send {
        async { Ok(()) }
    }
}
