//! Session state containers

pub mod auth;
pub mod filter;
pub mod issues;
pub mod session;
pub mod stats;

pub use auth::{AuthError, AuthState, AuthStore, IdentityProvider, MockIdentityProvider};
pub use filter::{IssueFilter, Proximity, TimeRange};
pub use issues::{IssueState, IssueStore, Latency, StoreError};
pub use session::{FileSessionStorage, SessionStorage};
