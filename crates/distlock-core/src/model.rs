//! Identifiers and operation outcomes shared by the lease manager and its callers.

use std::borrow::Borrow;
use std::fmt::{Display, Formatter};

/// Identifier of a lease session.
///
/// Generated by the lease manager on a successful acquisition. Random UUID v4
/// values make collisions practically impossible for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh session id
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for SessionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Result of an acquire attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquireOutcome {
    /// The key was free and is now locked by the new session
    Acquired(SessionId),
    /// The key is held by another session; nothing was registered
    Locked,
}

impl AcquireOutcome {
    pub fn is_acquired(&self) -> bool {
        matches!(self, Self::Acquired(_))
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        match self {
            Self::Acquired(id) => Some(id),
            Self::Locked => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_session_id_unique() {
        let mut ids: Vec<SessionId> = (0..100).map(|_| SessionId::generate()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_session_id_lookup_by_str() {
        let id = SessionId::generate();
        let mut map = HashMap::new();
        map.insert(id.clone(), 1);
        assert_eq!(map.get(id.as_str()), Some(&1));
    }

    #[test]
    fn test_acquire_outcome() {
        let id = SessionId::from("s-1");
        let acquired = AcquireOutcome::Acquired(id.clone());
        assert!(acquired.is_acquired());
        assert_eq!(acquired.session_id(), Some(&id));

        assert!(!AcquireOutcome::Locked.is_acquired());
        assert!(AcquireOutcome::Locked.session_id().is_none());
    }
}
