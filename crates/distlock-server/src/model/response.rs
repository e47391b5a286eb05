// Response bodies for the lock service API
// Field names are camelCase on the wire

use serde::{Deserialize, Serialize};

use distlock_core::AcquireOutcome;

/// GET /status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatusResult {
    pub running: bool,
}

/// POST /kv/acquire
///
/// `session_id` is empty when the acquisition failed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AcquireResult {
    pub session_id: String,
    pub success: bool,
}

impl From<AcquireOutcome> for AcquireResult {
    fn from(outcome: AcquireOutcome) -> Self {
        match outcome {
            AcquireOutcome::Acquired(id) => Self {
                session_id: id.into_inner(),
                success: true,
            },
            AcquireOutcome::Locked => Self {
                session_id: String::new(),
                success: false,
            },
        }
    }
}

/// POST /kv/release
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseResult {
    pub success: bool,
}

/// POST /kv/set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SetResult {
    pub success: bool,
}

/// GET /kv/get
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GetResult {
    pub success: bool,
    pub key: String,
    pub value: String,
}

impl GetResult {
    pub fn found(key: String, value: String) -> Self {
        Self {
            success: true,
            key,
            value,
        }
    }

    pub fn missing() -> Self {
        Self::default()
    }
}
