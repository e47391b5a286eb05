//! Lease manager
//!
//! Owns the key table and the session registry behind one reader/writer
//! guard and performs every multi-table transition atomically:
//! - acquire: lock a key and register a session with an expiry timer
//! - release: unlock a key held by a session and end that session
//! - set: creation-only write, or overwrite by the owning session
//! - renew: re-arm a session's expiry timer
//! - destroy: drop a session together with its key
//! - expiry: timer-driven destroy, validated against the timer's epoch
//!
//! Expiry timers are Tokio tasks. Cancelling one is best-effort: a timer
//! that already fired may be blocked on the guard while a renewal replaces
//! it. Each arm therefore gets a fresh epoch and the expiry transition only
//! acts when the session still carries the epoch it was armed with.

use std::collections::HashSet;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::RwLock;
use tokio::runtime::Handle;
use tracing::{debug, info};

use crate::error::{DistlockError, Result};
use crate::metrics;
use crate::model::{AcquireOutcome, SessionId};
use crate::session::{ExpiryHandle, SessionRegistry};
use crate::store::KeyTable;

/// Both tables, always locked together
#[derive(Debug, Default)]
struct LeaseState {
    table: KeyTable,
    sessions: SessionRegistry,
    /// Last epoch handed out to an expiry timer
    last_epoch: u64,
}

impl LeaseState {
    fn next_epoch(&mut self) -> u64 {
        self.last_epoch += 1;
        self.last_epoch
    }

    /// Locked keys and live sessions must match one to one.
    fn debug_check_invariants(&self) {
        if !cfg!(debug_assertions) {
            return;
        }

        let mut leased_keys = HashSet::new();
        for session in self.sessions.iter() {
            debug_assert!(
                self.table.get(session.key()).is_some_and(|entry| entry.locked),
                "session {} references key '{}' which is not locked",
                session.id(),
                session.key()
            );
            debug_assert!(
                leased_keys.insert(session.key()),
                "key '{}' is leased by more than one session",
                session.key()
            );
        }

        let locked = self.table.iter().filter(|(_, entry)| entry.locked).count();
        debug_assert_eq!(
            locked,
            self.sessions.len(),
            "locked keys and live sessions out of sync"
        );
    }
}

struct LeaseInner {
    state: RwLock<LeaseState>,
    runtime: Handle,
}

impl LeaseInner {
    /// Timer-driven expiry transition
    fn expire(&self, session_id: &SessionId, key: &str, epoch: u64) {
        let mut guard = self.state.write();
        let state = &mut *guard;

        let current = state
            .sessions
            .lookup(session_id.as_str())
            .is_some_and(|session| session.key() == key && session.epoch() == epoch);
        if !current {
            debug!(session_id = %session_id, key, epoch, "Ignoring stale expiry timer");
            return;
        }

        state.table.remove(key);
        // The removed handle belongs to this very task; dropping it detaches.
        state.sessions.remove(session_id.as_str());
        state.debug_check_invariants();

        metrics::record_expired();
        metrics::set_active_sessions(state.sessions.len());
        info!(session_id = %session_id, key, "Session expired, key reclaimed");
    }
}

/// Atomic lock/session/lease transitions over a shared in-memory store.
///
/// Cheap to clone; clones share the same tables.
#[derive(Clone)]
pub struct LeaseManager {
    inner: Arc<LeaseInner>,
}

impl LeaseManager {
    /// Create a manager whose expiry timers run on the current Tokio runtime.
    pub fn new() -> Result<Self> {
        let runtime =
            Handle::try_current().map_err(|e| DistlockError::RuntimeUnavailable(e.to_string()))?;
        Ok(Self::with_runtime(runtime))
    }

    /// Create a manager whose expiry timers run on `runtime`.
    pub fn with_runtime(runtime: Handle) -> Self {
        Self {
            inner: Arc::new(LeaseInner {
                state: RwLock::new(LeaseState::default()),
                runtime,
            }),
        }
    }

    /// Try to lock `key` for `ttl`.
    ///
    /// An unseen key is created with `value`; an existing unlocked key keeps
    /// its current value. Fails immediately when the key is already locked.
    pub fn acquire(&self, key: &str, value: &str, ttl: Duration) -> AcquireOutcome {
        let session_id = SessionId::generate();

        let mut guard = self.inner.state.write();
        let state = &mut *guard;

        let entry = state.table.get_or_create(key, value);
        if entry.locked {
            drop(guard);
            metrics::record_operation(metrics::ACQUIRE_TOTAL, false);
            debug!(key, "Acquire rejected, key already locked");
            return AcquireOutcome::Locked;
        }

        entry.locked = true;
        state.sessions.create(session_id.clone(), key);
        self.arm(state, session_id.as_str(), ttl);
        state.debug_check_invariants();

        metrics::record_operation(metrics::ACQUIRE_TOTAL, true);
        metrics::set_active_sessions(state.sessions.len());
        debug!(key, session_id = %session_id, ttl_ms = ttl.as_millis() as u64, "Lock acquired");

        AcquireOutcome::Acquired(session_id)
    }

    /// Unlock `key` if `session_id` holds it.
    ///
    /// The value is kept and the session ends: its timer is cancelled and it
    /// is removed from the registry.
    pub fn release(&self, key: &str, session_id: &str) -> bool {
        let mut guard = self.inner.state.write();
        let state = &mut *guard;

        let owns = state.table.get(key).is_some()
            && state
                .sessions
                .lookup(session_id)
                .is_some_and(|session| session.key() == key);
        if !owns {
            drop(guard);
            metrics::record_operation(metrics::RELEASE_TOTAL, false);
            debug!(key, session_id, "Release rejected, session does not hold key");
            return false;
        }

        if let Some(entry) = state.table.get_mut(key) {
            entry.locked = false;
        }
        if let Some(mut session) = state.sessions.remove(session_id) {
            session.cancel_expiry();
        }
        state.debug_check_invariants();

        metrics::record_operation(metrics::RELEASE_TOTAL, true);
        metrics::set_active_sessions(state.sessions.len());
        debug!(key, session_id, "Lock released");
        true
    }

    /// Write `value` to `key`.
    ///
    /// With a session id the write succeeds only if that session leases
    /// `key`. Without one it only creates a missing key.
    pub fn set(&self, key: &str, value: &str, session_id: Option<&str>) -> bool {
        let mut guard = self.inner.state.write();
        let state = &mut *guard;

        let success = match session_id {
            Some(session_id) => {
                let authorized = state
                    .sessions
                    .lookup(session_id)
                    .is_some_and(|session| session.key() == key);
                authorized && state.table.overwrite(key, value)
            }
            None => state.table.set_unconditional(key, value),
        };
        state.debug_check_invariants();
        drop(guard);

        metrics::record_operation(metrics::SET_TOTAL, success);
        debug!(key, session_id, success, "Set");
        success
    }

    /// Current value of `key`
    pub fn get(&self, key: &str) -> Option<String> {
        self.inner
            .state
            .read()
            .table
            .get(key)
            .map(|entry| entry.value.clone())
    }

    /// Whether `key` is currently locked
    pub fn is_locked(&self, key: &str) -> bool {
        self.inner
            .state
            .read()
            .table
            .get(key)
            .is_some_and(|entry| entry.locked)
    }

    /// Keys starting with `prefix`, sorted; all keys for an empty prefix
    pub fn list_keys(&self, prefix: &str) -> Vec<String> {
        self.inner.state.read().table.list_keys(prefix)
    }

    /// Key leased by `session_id`, if the session is live
    pub fn session_key(&self, session_id: &str) -> Option<String> {
        self.inner
            .state
            .read()
            .sessions
            .lookup(session_id)
            .map(|session| session.key().to_string())
    }

    pub fn session_count(&self) -> usize {
        self.inner.state.read().sessions.len()
    }

    /// Restart the expiry timer of `session_id` with `ttl`.
    ///
    /// Unknown or already expired sessions are ignored; the return value
    /// only tells whether a session was found.
    pub fn renew(&self, session_id: &str, ttl: Duration) -> bool {
        let mut guard = self.inner.state.write();
        let state = &mut *guard;

        let found = state.sessions.lookup(session_id).is_some();
        if found {
            self.arm(state, session_id, ttl);
        }
        drop(guard);

        metrics::record_operation(metrics::RENEW_TOTAL, found);
        if found {
            debug!(session_id, ttl_ms = ttl.as_millis() as u64, "Session renewed");
        } else {
            debug!(session_id, "Renew ignored, unknown session");
        }
        found
    }

    /// End `session_id` and delete the key it leases, value included.
    ///
    /// Unknown sessions are ignored; the return value only tells whether a
    /// session was found.
    pub fn destroy(&self, session_id: &str) -> bool {
        let mut guard = self.inner.state.write();
        let state = &mut *guard;

        let Some(mut session) = state.sessions.remove(session_id) else {
            drop(guard);
            metrics::record_operation(metrics::DESTROY_TOTAL, false);
            debug!(session_id, "Destroy ignored, unknown session");
            return false;
        };

        session.cancel_expiry();
        state.table.remove(session.key());
        state.debug_check_invariants();

        metrics::record_operation(metrics::DESTROY_TOTAL, true);
        metrics::set_active_sessions(state.sessions.len());
        debug!(session_id, key = session.key(), "Session destroyed");
        true
    }

    /// Cancel every pending expiry timer and forget all sessions and keys.
    ///
    /// Returns the number of sessions that were still live.
    pub fn shutdown(&self) -> usize {
        let mut guard = self.inner.state.write();
        let state = &mut *guard;

        let mut dropped = 0;
        for mut session in state.sessions.drain() {
            session.cancel_expiry();
            dropped += 1;
        }
        state.table = KeyTable::new();

        metrics::set_active_sessions(0);
        info!(sessions = dropped, "Lease manager stopped");
        dropped
    }

    /// Arm (or re-arm) the expiry timer of a registered session.
    fn arm(&self, state: &mut LeaseState, session_id: &str, ttl: Duration) {
        let epoch = state.next_epoch();
        let Some(session) = state.sessions.lookup_mut(session_id) else {
            return;
        };

        let id = session.id().clone();
        let key = session.key().to_string();
        let inner: Weak<LeaseInner> = Arc::downgrade(&self.inner);

        let handle = self.inner.runtime.spawn(async move {
            tokio::time::sleep(ttl).await;
            if let Some(inner) = inner.upgrade() {
                inner.expire(&id, &key, epoch);
            }
        });

        session.rearm(ExpiryHandle::new(handle), epoch);
    }
}
