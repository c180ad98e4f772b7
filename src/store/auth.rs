//! Auth store
//!
//! Holds the session identity. Credentials are checked by an
//! [`IdentityProvider`]; the resulting identity is persisted through a
//! [`SessionStorage`] and restored on the next start.

use super::session::{FileSessionStorage, SessionError, SessionStorage};
use crate::models::{LoginRequest, RegisterRequest, User, UserRole};
use crate::validation::{validate_login, validate_registration, ValidationError};
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Password shared by the built-in demo accounts
pub const DEMO_PASSWORD: &str = "password";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email already in use")]
    EmailInUse,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to persist session")]
    Storage(#[from] SessionError),
}

// =============================================================================
// Identity Provider
// =============================================================================

/// Identity backend, replaceable by a real authentication service
pub trait IdentityProvider: Send + Sync + 'static {
    fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Option<User>> + Send;

    fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<User, AuthError>> + Send;

    /// Undo a registration that could not be completed
    fn remove(&self, user_id: &str) -> impl Future<Output = ()> + Send;
}

struct Account {
    user: User,
    password: String,
}

/// Fixed demo identities plus anything registered during this process
pub struct MockIdentityProvider {
    accounts: RwLock<Vec<Account>>,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        let demo = |id: &str, name: &str, email: &str, role, photo: &str| Account {
            user: User {
                id: id.to_string(),
                name: name.to_string(),
                email: email.to_string(),
                role,
                avatar: Some(format!(
                    "https://images.pexels.com/photos/{photo}/pexels-photo-{photo}.jpeg?auto=compress&cs=tinysrgb&w=100"
                )),
            },
            password: DEMO_PASSWORD.to_string(),
        };

        Self {
            accounts: RwLock::new(vec![
                demo("1", "John Citizen", "john@example.com", UserRole::Citizen, "220453"),
                demo("2", "Admin User", "admin@example.com", UserRole::Admin, "1239291"),
            ]),
        }
    }
}

impl Default for MockIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider for MockIdentityProvider {
    async fn authenticate(&self, email: &str, password: &str) -> Option<User> {
        self.accounts
            .read()
            .await
            .iter()
            .find(|a| a.user.email.eq_ignore_ascii_case(email.trim()) && a.password == password)
            .map(|a| a.user.clone())
    }

    async fn register(&self, name: &str, email: &str, password: &str) -> Result<User, AuthError> {
        let email = email.trim();
        let mut accounts = self.accounts.write().await;
        if accounts
            .iter()
            .any(|a| a.user.email.eq_ignore_ascii_case(email))
        {
            return Err(AuthError::EmailInUse);
        }

        let user = User {
            id: format!("user_{}", Uuid::new_v4().simple()),
            name: name.trim().to_string(),
            email: email.to_string(),
            role: UserRole::Citizen,
            avatar: None,
        };
        accounts.push(Account {
            user: user.clone(),
            password: password.to_string(),
        });
        Ok(user)
    }

    async fn remove(&self, user_id: &str) {
        self.accounts.write().await.retain(|a| a.user.id != user_id);
    }
}

// =============================================================================
// Auth Store
// =============================================================================

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub is_authenticated: bool,
    pub user: Option<User>,
    pub is_loading: bool,
    pub error: Option<String>,
}

pub struct AuthStore<P = MockIdentityProvider, St = FileSessionStorage> {
    provider: P,
    storage: St,
    latency: Duration,
    state: RwLock<AuthState>,
}

impl<P: IdentityProvider, St: SessionStorage> AuthStore<P, St> {
    pub fn new(provider: P, storage: St, latency: Duration) -> Self {
        Self {
            provider,
            storage,
            latency,
            state: RwLock::new(AuthState::default()),
        }
    }

    /// Restore the persisted identity, dropping a corrupt record
    pub async fn restore(&self) -> Option<User> {
        match self.storage.load().await {
            Ok(Some(user)) => {
                tracing::info!("Restored session for {}", user.email);
                self.set_user(Some(user.clone())).await;
                Some(user)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Discarding stored session: {}", e);
                if let Err(e) = self.storage.clear().await {
                    tracing::error!("Failed to clear stored session: {}", e);
                }
                None
            }
        }
    }

    pub async fn login(&self, input: &LoginRequest) -> Result<User, AuthError> {
        self.begin().await;

        let result = async {
            validate_login(input)?;
            tokio::time::sleep(self.latency).await;
            let user = self
                .provider
                .authenticate(&input.email, &input.password)
                .await
                .ok_or(AuthError::InvalidCredentials)?;
            self.storage.save(&user).await?;
            Ok::<_, AuthError>(user)
        }
        .await;

        self.finish(&result).await;
        if let Ok(ref user) = result {
            tracing::info!("User {} logged in", user.email);
        }
        result
    }

    pub async fn register(&self, input: &RegisterRequest) -> Result<User, AuthError> {
        self.begin().await;

        let result = async {
            validate_registration(input)?;
            tokio::time::sleep(self.latency).await;
            let user = self
                .provider
                .register(&input.name, &input.email, &input.password)
                .await?;
            if let Err(e) = self.storage.save(&user).await {
                self.provider.remove(&user.id).await;
                return Err(AuthError::Storage(e));
            }
            Ok::<_, AuthError>(user)
        }
        .await;

        self.finish(&result).await;
        if let Ok(ref user) = result {
            tracing::info!("Registered new citizen {}", user.email);
        }
        result
    }

    /// Forget the identity; the in-memory session is cleared even if the
    /// stored record cannot be removed
    pub async fn logout(&self) {
        if let Err(e) = self.storage.clear().await {
            tracing::error!("Failed to clear stored session: {}", e);
        }
        if let Some(user) = self.current_user().await {
            tracing::info!("User {} logged out", user.email);
        }
        self.set_user(None).await;
    }

    pub async fn current_user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated
    }

    pub async fn snapshot(&self) -> AuthState {
        self.state.read().await.clone()
    }

    async fn begin(&self) {
        let mut state = self.state.write().await;
        state.is_loading = true;
        state.error = None;
    }

    async fn finish(&self, result: &Result<User, AuthError>) {
        let mut state = self.state.write().await;
        state.is_loading = false;
        match result {
            Ok(user) => {
                state.user = Some(user.clone());
                state.is_authenticated = true;
            }
            Err(e) => {
                tracing::warn!("Authentication failed: {}", e);
                state.error = Some(e.to_string());
            }
        }
    }

    async fn set_user(&self, user: Option<User>) {
        let mut state = self.state.write().await;
        state.is_authenticated = user.is_some();
        state.user = user;
    }
}
