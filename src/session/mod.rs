//! The client's session state machine.
//!
//! [`SessionStore`] owns the one [`Session`] record of the process and is the only
//! thing that mutates it, through `fetch_user`, `login`, `register`, `logout` and
//! `set_user`. Hosts read it with [`SessionStore::snapshot`] or watch it with
//! [`SessionStore::subscribe`].
//!
//! Overlapping operations are not serialized: each one writes its own result when it
//! finishes, so the last to finish wins. `is_loading` stays true while any of them is
//! still in flight.

mod outcome;

pub use outcome::AuthOutcome;

use crate::error::AppError;
use crate::models::{AccountKind, LoginRequest, RegisterRequest};
use crate::storage::{KeyValueStore, USER_TYPE_KEY};
use crate::transport::{ApiResponse, Transport};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use validator::Validate;

pub const LOGOUT_PATH: &str = "/auth/logout";

/// Snapshot of the client's identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    /// Last identity payload received. Shape depends on the account kind.
    pub user: Option<Value>,
    pub account_kind: Option<AccountKind>,
    /// True only after a successful login, rehydration or `set_user`.
    pub is_authenticated: bool,
    /// True while a session operation is in flight.
    pub is_loading: bool,
}

impl Session {
    /// Empty and signed out, as at cold start.
    pub fn is_empty(&self) -> bool {
        self.user.is_none() && self.account_kind.is_none() && !self.is_authenticated
    }
}

pub struct SessionStore {
    transport: Arc<Transport>,
    storage: Arc<dyn KeyValueStore>,
    state: watch::Sender<Session>,
    in_flight: AtomicUsize,
}

/// Clears the loading flag when the owning operation ends, however it ends.
struct LoadingGuard<'a> {
    store: &'a SessionStore,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let in_flight = &self.store.in_flight;
        self.store.state.send_modify(|s| {
            let remaining = in_flight.fetch_sub(1, Ordering::SeqCst) - 1;
            s.is_loading = remaining > 0;
        });
    }
}

impl SessionStore {
    pub fn new(transport: Arc<Transport>, storage: Arc<dyn KeyValueStore>) -> Self {
        let (state, _) = watch::channel(Session::default());
        Self {
            transport,
            storage,
            state,
            in_flight: AtomicUsize::new(0),
        }
    }

    pub fn transport(&self) -> &Arc<Transport> {
        &self.transport
    }

    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Rehydrates the session from the persisted account-kind marker.
    ///
    /// With no marker the session is reset and no request is made. Otherwise the
    /// kind's "whoami" endpoint is fetched; any failure resets the session. Never fails.
    pub async fn fetch_user(&self) {
        let _loading = self.begin_loading();

        let Some(kind) = self.stored_kind().await else {
            self.reset();
            return;
        };

        match self.transport.get(&kind.me_path()).await {
            Ok(response) => match whoami_user(response) {
                Some(user) => self.authenticate(kind, user),
                None => {
                    log::warn!("{} returned no user, clearing session", kind.me_path());
                    self.reset();
                }
            },
            Err(e) => {
                log::warn!("Could not restore {} session: {}", kind, e);
                self.reset();
            }
        }
    }

    /// Signs in. On success the marker is persisted and the session is authenticated;
    /// on failure the session is left exactly as it was.
    pub async fn login(&self, kind: AccountKind, credentials: &LoginRequest) -> AuthOutcome {
        let _loading = self.begin_loading();

        if let Err(e) = credentials.validate() {
            return AppError::from(e).into();
        }

        let response = match self.transport.post(&kind.login_path(), credentials).await {
            Ok(response) => response,
            Err(e) => {
                log::warn!("{} login failed: {}", kind, e);
                return e.into();
            }
        };

        let Some(user) = response.field("user").cloned() else {
            return AppError::Decode("Login response did not include a user".into()).into();
        };

        if let Err(e) = self.persist_kind(kind).await {
            return e.into();
        }

        self.authenticate(kind, user.clone());
        AuthOutcome::Success { data: user }
    }

    /// Creates an account. The returned user is stored and the marker persisted, but
    /// the session stays unauthenticated: a separate login (or email verification)
    /// is required before it is.
    pub async fn register(&self, kind: AccountKind, data: &RegisterRequest) -> AuthOutcome {
        let _loading = self.begin_loading();

        if let Err(e) = data.validate() {
            return AppError::from(e).into();
        }

        let response = match self.transport.post(&kind.register_path(), data).await {
            Ok(response) => response,
            Err(e) => {
                log::warn!("{} registration failed: {}", kind, e);
                return e.into();
            }
        };

        if let Err(e) = self.persist_kind(kind).await {
            return e.into();
        }

        let user = response.field("user").or_else(|| response.data()).cloned();
        self.state.send_modify(|s| {
            s.user = user;
            s.account_kind = Some(kind);
            s.is_authenticated = false;
        });

        AuthOutcome::Success {
            data: response.body,
        }
    }

    /// Signs out. The server call is best effort; the marker is always removed and
    /// the session always reset. Safe to call when already signed out.
    pub async fn logout(&self) {
        let _loading = self.begin_loading();

        if let Err(e) = self.transport.get(LOGOUT_PATH).await {
            log::warn!("Logout request failed, clearing local session anyway: {}", e);
        }
        if let Err(e) = self.storage.remove_item(USER_TYPE_KEY).await {
            log::warn!("Could not remove persisted account kind: {}", e);
        }
        self.reset();
    }

    /// Replaces the user record directly, e.g. after a profile update returned a
    /// fresh one. The marker is persisted first; if that fails nothing changes.
    pub async fn set_user(&self, kind: AccountKind, user: Option<Value>) -> Result<(), AppError> {
        self.persist_kind(kind).await?;
        self.state.send_modify(|s| {
            s.is_authenticated = user.is_some();
            s.user = user;
            s.account_kind = Some(kind);
        });
        Ok(())
    }

    fn begin_loading(&self) -> LoadingGuard<'_> {
        self.state.send_modify(|s| {
            self.in_flight.fetch_add(1, Ordering::SeqCst);
            s.is_loading = true;
        });
        LoadingGuard { store: self }
    }

    fn authenticate(&self, kind: AccountKind, user: Value) {
        self.state.send_modify(|s| {
            s.user = Some(user);
            s.account_kind = Some(kind);
            s.is_authenticated = true;
        });
    }

    fn reset(&self) {
        self.state.send_modify(|s| {
            *s = Session {
                is_loading: s.is_loading,
                ..Session::default()
            };
        });
    }

    async fn persist_kind(&self, kind: AccountKind) -> Result<(), AppError> {
        self.storage
            .set_item(USER_TYPE_KEY, kind.as_str())
            .await
            .map_err(|e| {
                log::warn!("Could not persist account kind {}: {}", kind, e);
                e
            })
    }

    async fn stored_kind(&self) -> Option<AccountKind> {
        match self.storage.get_item(USER_TYPE_KEY).await {
            Ok(Some(value)) => match value.parse() {
                Ok(kind) => Some(kind),
                Err(e) => {
                    log::warn!("Ignoring persisted marker: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                log::warn!("Could not read persisted account kind: {}", e);
                None
            }
        }
    }
}

/// The identity record in a "whoami" response: the envelope's `data`, else the body.
fn whoami_user(response: ApiResponse) -> Option<Value> {
    if response.status != 200 {
        return None;
    }
    if let Some(data) = response.data() {
        return Some(data.clone());
    }
    if response.body.is_null() {
        None
    } else {
        Some(response.body)
    }
}
