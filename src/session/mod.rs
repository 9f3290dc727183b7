//! Sign-in state and authorization-failure handling.
//!
//! Every authenticated request reads its token through [`Session`], and every
//! 403 goes back through [`Session::on_forbidden`] so the "was this a logout or
//! a revocation" decision is made in exactly one place.

mod credentials;

pub use credentials::{CredentialStore, FileCredentialStore, MemoryCredentialStore, StoredSession};
#[cfg(test)]
pub(crate) use credentials::tests::SlowCredentialStore;

use crate::api::{Backend, LoginRequest, LoginResponse, LoginRole};
use crate::config::ApiConfig;
use crate::error::{Error, Result};
use std::sync::{Arc, Mutex, PoisonError};

/// Outcome of a 403 on an authenticated call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// No token was stored: the user had already signed out. Stay quiet.
    AlreadyLoggedOut,
    /// A token was stored and the server refused it. Local state was wiped.
    Revoked,
}

/// Shared handle over the credential store.
#[derive(Clone)]
pub struct Session {
    credentials: Arc<dyn CredentialStore>,
    /// Serializes the read-then-clear in [`Session::on_forbidden`].
    revocation: Arc<Mutex<()>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("signed_in", &self.is_signed_in())
            .finish()
    }
}

impl Session {
    pub fn new(credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            credentials,
            revocation: Arc::new(Mutex::new(())),
        }
    }

    /// Session backed by memory only.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCredentialStore::new()))
    }

    pub fn token(&self) -> Option<String> {
        self.credentials.token()
    }

    pub fn is_signed_in(&self) -> bool {
        self.token().is_some()
    }

    pub fn user_type(&self) -> Option<String> {
        self.credentials.load().ok().and_then(|s| s.user_type)
    }

    /// Decide what a 403 means and wipe local state if access was revoked.
    ///
    /// Concurrent 403s are decided one at a time, so only the first caller
    /// sees [`AuthFailure::Revoked`].
    pub fn on_forbidden(&self) -> AuthFailure {
        let _held = self
            .revocation
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if self.token().is_none() {
            tracing::debug!("403 after sign-out, ignoring");
            return AuthFailure::AlreadyLoggedOut;
        }

        tracing::warn!("Backend refused a stored token, signing out");
        if let Err(e) = self.credentials.clear() {
            tracing::error!(error = %e, "Failed to clear stored session");
        }
        AuthFailure::Revoked
    }

    /// Clear everything stored locally.
    pub fn logout(&self) -> Result<()> {
        tracing::info!("Signing out");
        self.credentials.clear()
    }

    /// Sign in and persist the session.
    ///
    /// A timeout or network failure is retried once after
    /// `login_retry_delay`, with the longer `login_retry_timeout`, so a
    /// backend that is still booting gets a second chance.
    pub async fn login(
        &self,
        backend: &dyn Backend,
        config: &ApiConfig,
        role: LoginRole,
        email: &str,
        password: &str,
    ) -> Result<LoginResponse> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(Error::invalid_input("Email and password are required"));
        }

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = match backend.login(role, &request, config.timeout()).await {
            Err(e) if e.is_transport() => {
                tracing::warn!(error = %e, "Login failed at transport level, retrying once");
                tokio::time::sleep(config.login_retry_delay()).await;
                backend
                    .login(role, &request, config.login_retry_timeout())
                    .await?
            }
            other => other?,
        };

        if response.access_token.is_empty() {
            return Err(Error::auth("Server returned an empty token"));
        }

        let mut user = response.user.clone().unwrap_or_else(|| serde_json::json!({}));
        if let Some(obj) = user.as_object_mut() {
            if let Some(paid) = response.has_paid {
                obj.insert("hasPaid".into(), paid.into());
            }
            if let Some(active) = response.is_active {
                obj.insert("isActive".into(), active.into());
            }
        }

        self.credentials.save(&StoredSession {
            token: Some(response.access_token.clone()),
            user_type: response
                .user_type
                .clone()
                .or_else(|| Some(format!("{role:?}").to_lowercase())),
            user: Some(user),
        })?;

        tracing::info!(?role, "Signed in");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockBackend;
    use std::time::Duration;

    fn login_ok(token: &str) -> LoginResponse {
        LoginResponse {
            access_token: token.to_string(),
            user_type: Some("user".into()),
            has_paid: Some(true),
            is_active: Some(true),
            user: None,
        }
    }

    #[test]
    fn test_forbidden_without_token_is_silent() {
        let session = Session::in_memory();
        assert_eq!(session.on_forbidden(), AuthFailure::AlreadyLoggedOut);
    }

    #[test]
    fn test_forbidden_with_token_revokes_and_clears() {
        let session = Session::new(Arc::new(MemoryCredentialStore::with_token("t")));
        assert_eq!(session.on_forbidden(), AuthFailure::Revoked);
        assert!(!session.is_signed_in());
        // The next 403 finds nothing to revoke.
        assert_eq!(session.on_forbidden(), AuthFailure::AlreadyLoggedOut);
    }

    #[test]
    fn test_concurrent_forbidden_revokes_once() {
        let session = Session::new(Arc::new(SlowCredentialStore::with_token(
            "t",
            Duration::from_millis(50),
        )));
        let barrier = Arc::new(std::sync::Barrier::new(2));

        let outcomes: Vec<AuthFailure> = (0..2)
            .map(|_| {
                let session = session.clone();
                let barrier = barrier.clone();
                std::thread::spawn(move || {
                    barrier.wait();
                    session.on_forbidden()
                })
            })
            .collect::<Vec<_>>()
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect();

        let revoked = outcomes
            .iter()
            .filter(|o| **o == AuthFailure::Revoked)
            .count();
        assert_eq!(revoked, 1);
        assert!(!session.is_signed_in());
    }

    #[tokio::test]
    async fn test_login_persists_session() {
        let mut backend = MockBackend::new();
        backend
            .expect_login()
            .withf(|role, req, _| *role == LoginRole::User && req.email == "me@x.io")
            .times(1)
            .returning(|_, _, _| Ok(login_ok("tok")));

        let session = Session::in_memory();
        session
            .login(&backend, &ApiConfig::default(), LoginRole::User, " me@x.io ", "pw")
            .await
            .unwrap();

        assert_eq!(session.token().as_deref(), Some("tok"));
        assert_eq!(session.user_type().as_deref(), Some("user"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_retries_once_with_longer_timeout() {
        let config = ApiConfig::default();
        let short = config.timeout();
        let long = config.login_retry_timeout();

        let mut backend = MockBackend::new();
        let mut seq = mockall::Sequence::new();
        backend
            .expect_login()
            .withf(move |_, _, timeout| *timeout == short)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Err(Error::Timeout));
        backend
            .expect_login()
            .withf(move |_, _, timeout| *timeout == long)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(login_ok("late")));

        let session = Session::in_memory();
        let started = tokio::time::Instant::now();
        session
            .login(&backend, &config, LoginRole::User, "a@b.c", "pw")
            .await
            .unwrap();

        assert!(started.elapsed() >= Duration::from_millis(config.login_retry_delay_ms));
        assert_eq!(session.token().as_deref(), Some("late"));
    }

    #[tokio::test]
    async fn test_login_does_not_retry_rejections() {
        let mut backend = MockBackend::new();
        backend.expect_login().times(1).returning(|_, _, _| {
            Err(Error::from_status(401, Some("Invalid credentials".into())))
        });

        let session = Session::in_memory();
        let err = session
            .login(&backend, &ApiConfig::default(), LoginRole::User, "a@b.c", "bad")
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), "Invalid credentials");
        assert!(!session.is_signed_in());
    }

    #[tokio::test]
    async fn test_login_requires_fields() {
        let backend = MockBackend::new();
        let err = Session::in_memory()
            .login(&backend, &ApiConfig::default(), LoginRole::Admin, "", "pw")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
