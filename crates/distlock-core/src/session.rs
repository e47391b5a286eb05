//! Session registry
//!
//! Maps session ids to the key they lease and to the handle of their pending
//! expiry timer. Like the key table, the registry relies on the lease
//! manager's guard for synchronization.

use std::collections::HashMap;

use tokio::task::JoinHandle;

use crate::model::SessionId;

/// Handle to a pending expiry timer task
#[derive(Debug)]
pub(crate) struct ExpiryHandle(JoinHandle<()>);

impl ExpiryHandle {
    pub(crate) fn new(handle: JoinHandle<()>) -> Self {
        Self(handle)
    }

    /// Best-effort cancellation.
    ///
    /// A timer that already woke up and is waiting for the guard keeps
    /// running; the expiry transition re-validates the epoch for that case.
    pub(crate) fn cancel(self) {
        self.0.abort();
    }
}

/// A time-bounded lease binding one session to one key
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    key: String,
    /// Identity of the currently armed timer, 0 before the first arm
    epoch: u64,
    expiry: Option<ExpiryHandle>,
}

impl Session {
    fn new(id: SessionId, key: &str) -> Self {
        Self {
            id,
            key: key.to_string(),
            epoch: 0,
            expiry: None,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn has_pending_expiry(&self) -> bool {
        self.expiry.is_some()
    }

    /// Install a new timer, cancelling the previous one
    pub(crate) fn rearm(&mut self, handle: ExpiryHandle, epoch: u64) {
        self.cancel_expiry();
        self.expiry = Some(handle);
        self.epoch = epoch;
    }

    pub(crate) fn cancel_expiry(&mut self) {
        if let Some(handle) = self.expiry.take() {
            handle.cancel();
        }
    }
}

/// Session id -> session
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<SessionId, Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, session_id: &str) -> Option<&Session> {
        self.sessions.get(session_id)
    }

    pub(crate) fn lookup_mut(&mut self, session_id: &str) -> Option<&mut Session> {
        self.sessions.get_mut(session_id)
    }

    /// Register a new session for `key` with no timer attached yet
    pub(crate) fn create(&mut self, session_id: SessionId, key: &str) -> &mut Session {
        debug_assert!(
            !self.sessions.contains_key(&session_id),
            "session id collision: {}",
            session_id
        );
        self.sessions
            .entry(session_id.clone())
            .or_insert_with(|| Session::new(session_id, key))
    }

    /// Remove a session. The caller clears the lock and cancels the timer.
    pub(crate) fn remove(&mut self, session_id: &str) -> Option<Session> {
        self.sessions.remove(session_id)
    }

    pub(crate) fn drain(&mut self) -> impl Iterator<Item = Session> + '_ {
        self.sessions.drain().map(|(_, session)| session)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_lookup_remove() {
        let mut registry = SessionRegistry::new();
        let id = SessionId::generate();

        let session = registry.create(id.clone(), "jobs/nightly");
        assert_eq!(session.key(), "jobs/nightly");
        assert_eq!(session.epoch(), 0);
        assert!(!session.has_pending_expiry());

        assert_eq!(registry.lookup(id.as_str()).unwrap().id(), &id);
        assert_eq!(registry.len(), 1);

        let removed = registry.remove(id.as_str()).unwrap();
        assert_eq!(removed.key(), "jobs/nightly");
        assert!(registry.lookup(id.as_str()).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_lookup_unknown() {
        let registry = SessionRegistry::new();
        assert!(registry.lookup("nonexistent-id").is_none());
    }

    #[tokio::test]
    async fn test_rearm_cancels_previous_timer() {
        let mut registry = SessionRegistry::new();
        let id = SessionId::generate();
        registry.create(id.clone(), "k");

        let first = tokio::spawn(std::future::pending::<()>());
        let first_abort = first.abort_handle();
        registry
            .lookup_mut(id.as_str())
            .unwrap()
            .rearm(ExpiryHandle::new(first), 1);

        let second = tokio::spawn(std::future::pending::<()>());
        let session = registry.lookup_mut(id.as_str()).unwrap();
        session.rearm(ExpiryHandle::new(second), 2);
        assert_eq!(session.epoch(), 2);
        assert!(session.has_pending_expiry());

        for _ in 0..16 {
            if first_abort.is_finished() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(first_abort.is_finished());

        session.cancel_expiry();
        assert!(!session.has_pending_expiry());
    }
}
