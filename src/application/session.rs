//! Session store
//!
//! The single source of truth for who is signed in. Sign-in delegates
//! credential verification to the injected [`AuthProvider`] collaborator;
//! sign-out clears local state unconditionally. Every state transition is
//! published to subscribers before the triggering call returns, so a
//! guard evaluated immediately afterwards sees the new state.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::user::User;

/// Default bound on collaborator calls during sign-in
const DEFAULT_VERIFY_TIMEOUT: Duration = Duration::from_secs(5);

/// Event channel capacity
const EVENT_CAPACITY: usize = 256;

/// Why a sign-in attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account is deactivated")]
    InactiveAccount,

    #[error("Authentication service unavailable")]
    ServiceUnavailable,
}

/// Credential verification collaborator.
///
/// Production wires a database-backed implementation; tests inject fakes.
/// There is no fallback to built-in credentials.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Verify credentials and return the full user profile on success.
    async fn verify_credentials(&self, email: &str, password: &str) -> Result<User, AuthError>;
}

/// An established session
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub user: User,
    pub signed_in_at: DateTime<Utc>,
}

/// Session state transition, published synchronously with the change
#[derive(Debug, Clone)]
pub enum SessionEvent {
    SignedIn { session_id: String, user_id: String },
    SignedOut { session_id: String, user_id: String },
    Revoked { session_id: String, user_id: String },
}

/// Thread-safe store of active sessions
pub struct SessionStore {
    provider: Arc<dyn AuthProvider>,
    sessions: DashMap<String, Session>,
    events: broadcast::Sender<SessionEvent>,
    verify_timeout: Duration,
}

/// Shared, reference-counted session store
pub type SharedSessionStore = Arc<SessionStore>;

impl SessionStore {
    pub fn new(provider: Arc<dyn AuthProvider>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            provider,
            sessions: DashMap::new(),
            events,
            verify_timeout: DEFAULT_VERIFY_TIMEOUT,
        }
    }

    pub fn with_verify_timeout(mut self, timeout: Duration) -> Self {
        self.verify_timeout = timeout;
        self
    }

    /// Wrap in `Arc` for shared ownership
    pub fn shared(provider: Arc<dyn AuthProvider>) -> SharedSessionStore {
        Arc::new(Self::new(provider))
    }

    /// Verify credentials via the collaborator and establish a session.
    ///
    /// The collaborator call is bounded; expiry maps to
    /// [`AuthError::ServiceUnavailable`] and leaves the store untouched
    /// (fail closed, never optimistically authenticate).
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let verified =
            tokio::time::timeout(self.verify_timeout, self.provider.verify_credentials(email, password))
                .await;

        let user = match verified {
            Ok(result) => result?,
            Err(_) => {
                warn!(email, "Credential verification timed out");
                return Err(AuthError::ServiceUnavailable);
            }
        };

        if !user.is_active {
            return Err(AuthError::InactiveAccount);
        }

        let session = Session {
            id: Uuid::new_v4().to_string(),
            user,
            signed_in_at: Utc::now(),
        };
        self.sessions.insert(session.id.clone(), session.clone());

        // Published before returning: a guard evaluation scheduled after
        // this call must observe the new state.
        let _ = self.events.send(SessionEvent::SignedIn {
            session_id: session.id.clone(),
            user_id: session.user.id.clone(),
        });
        info!(
            session_id = session.id.as_str(),
            user_id = session.user.id.as_str(),
            "Session established"
        );
        Ok(session)
    }

    /// Clear a session. The local state change is unconditional; any
    /// collaborator work tied to sign-out (audit writes, remote
    /// invalidation) is the caller's concern and must not block this.
    ///
    /// Returns the signed-out user so callers can record the event.
    pub fn sign_out(&self, session_id: &str) -> Option<User> {
        match self.sessions.remove(session_id) {
            Some((_, session)) => {
                let _ = self.events.send(SessionEvent::SignedOut {
                    session_id: session.id.clone(),
                    user_id: session.user.id.clone(),
                });
                info!(session_id, user_id = session.user.id.as_str(), "Session signed out");
                Some(session.user)
            }
            None => {
                warn!(session_id, "Sign-out for unknown session");
                None
            }
        }
    }

    /// Externally-initiated invalidation (admin revocation, expiry).
    /// Subsequent guard evaluations treat the session as unauthenticated.
    pub fn revoke(&self, session_id: &str) -> bool {
        match self.sessions.remove(session_id) {
            Some((_, session)) => {
                let _ = self.events.send(SessionEvent::Revoked {
                    session_id: session.id.clone(),
                    user_id: session.user.id.clone(),
                });
                info!(session_id, user_id = session.user.id.as_str(), "Session revoked");
                true
            }
            None => false,
        }
    }

    /// Synchronous snapshot of the session's user, `None` when the
    /// session is unknown, signed out, or revoked.
    pub fn current_user(&self, session_id: &str) -> Option<User> {
        self.sessions.get(session_id).map(|s| s.user.clone())
    }

    /// `is_authenticated == (current_user != null)`, always.
    pub fn is_authenticated(&self, session_id: &str) -> bool {
        self.sessions.contains_key(session_id)
    }

    /// All currently active sessions
    pub fn active_sessions(&self) -> Vec<Session> {
        self.sessions.iter().map(|r| r.value().clone()).collect()
    }

    /// Number of active sessions
    pub fn count(&self) -> usize {
        self.sessions.len()
    }

    /// Subscribe to session state transitions
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::access::{authorize, AccessDecision, RedirectTarget, Role, RouteRequirement};

    struct FakeProvider {
        result: Result<User, AuthError>,
    }

    #[async_trait]
    impl AuthProvider for FakeProvider {
        async fn verify_credentials(&self, _email: &str, _password: &str) -> Result<User, AuthError> {
            self.result.clone()
        }
    }

    /// Collaborator that never answers, to exercise the timeout path
    struct HangingProvider;

    #[async_trait]
    impl AuthProvider for HangingProvider {
        async fn verify_credentials(&self, _email: &str, _password: &str) -> Result<User, AuthError> {
            std::future::pending().await
        }
    }

    fn sample_user(role: Role, is_active: bool) -> User {
        User {
            id: "user-1".into(),
            email: "user@agency.gov.ph".into(),
            username: "user1".into(),
            first_name: "Test".into(),
            last_name: "User".into(),
            password_hash: String::new(),
            role,
            department: None,
            is_active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            last_login_at: None,
        }
    }

    #[tokio::test]
    async fn sign_in_is_visible_immediately() {
        let provider = Arc::new(FakeProvider {
            result: Ok(sample_user(Role::Admin, true)),
        });
        let store = SessionStore::new(provider);
        let mut events = store.subscribe();

        let session = store.sign_in("user@agency.gov.ph", "pw").await.unwrap();

        // No eventual-consistency window: the snapshot and the event are
        // both observable before anything else runs.
        let user = store.current_user(&session.id).expect("user visible");
        assert_eq!(user.id, "user-1");
        assert!(store.is_authenticated(&session.id));
        assert!(matches!(
            events.try_recv().unwrap(),
            SessionEvent::SignedIn { .. }
        ));
    }

    #[tokio::test]
    async fn failed_sign_in_leaves_state_untouched() {
        let provider = Arc::new(FakeProvider {
            result: Err(AuthError::InvalidCredentials),
        });
        let store = SessionStore::new(provider);

        let err = store.sign_in("user@agency.gov.ph", "wrong").await.unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);
        assert_eq!(store.count(), 0);
    }

    #[tokio::test]
    async fn inactive_account_is_rejected() {
        let provider = Arc::new(FakeProvider {
            result: Ok(sample_user(Role::Encoder, false)),
        });
        let store = SessionStore::new(provider);

        let err = store.sign_in("user@agency.gov.ph", "pw").await.unwrap_err();
        assert_eq!(err, AuthError::InactiveAccount);
        assert_eq!(store.count(), 0);
    }

    #[tokio::test]
    async fn collaborator_timeout_maps_to_service_unavailable() {
        let store = SessionStore::new(Arc::new(HangingProvider))
            .with_verify_timeout(Duration::from_millis(20));

        let err = store.sign_in("user@agency.gov.ph", "pw").await.unwrap_err();
        assert_eq!(err, AuthError::ServiceUnavailable);
        assert_eq!(store.count(), 0);
    }

    #[tokio::test]
    async fn sign_out_makes_guard_treat_session_as_unauthenticated() {
        let provider = Arc::new(FakeProvider {
            result: Ok(sample_user(Role::Admin, true)),
        });
        let store = SessionStore::new(provider);
        let session = store.sign_in("user@agency.gov.ph", "pw").await.unwrap();

        let signed_out = store.sign_out(&session.id).expect("user returned");
        assert_eq!(signed_out.id, "user-1");
        assert!(store.current_user(&session.id).is_none());
        assert!(!store.is_authenticated(&session.id));

        // Even a former admin is now just an unauthenticated visitor.
        let requirement = RouteRequirement::roles([Role::Admin]);
        let user = store.current_user(&session.id);
        assert_eq!(
            authorize(user.as_ref(), &requirement),
            AccessDecision::Redirect(RedirectTarget::Login)
        );
    }

    #[tokio::test]
    async fn sign_out_unknown_session_is_harmless() {
        let provider = Arc::new(FakeProvider {
            result: Err(AuthError::InvalidCredentials),
        });
        let store = SessionStore::new(provider);
        assert!(store.sign_out("no-such-session").is_none());
    }

    #[tokio::test]
    async fn revoked_session_no_longer_authenticates() {
        let provider = Arc::new(FakeProvider {
            result: Ok(sample_user(Role::Viewer, true)),
        });
        let store = SessionStore::new(provider);
        let session = store.sign_in("user@agency.gov.ph", "pw").await.unwrap();

        assert!(store.revoke(&session.id));
        assert!(store.current_user(&session.id).is_none());
        assert!(!store.revoke(&session.id));
    }
}
