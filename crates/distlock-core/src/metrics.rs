// Lock service metrics
// Counters per operation outcome plus a gauge of live sessions

use metrics::{counter, describe_counter, describe_gauge, gauge};

pub const ACQUIRE_TOTAL: &str = "distlock_acquire_total";
pub const RELEASE_TOTAL: &str = "distlock_release_total";
pub const SET_TOTAL: &str = "distlock_set_total";
pub const RENEW_TOTAL: &str = "distlock_renew_total";
pub const DESTROY_TOTAL: &str = "distlock_destroy_total";
pub const EXPIRED_TOTAL: &str = "distlock_expired_total";
pub const SESSIONS_ACTIVE: &str = "distlock_sessions_active";

/// Register descriptions for every lock metric.
/// Should be called once at startup, after the recorder is installed.
pub fn describe_metrics() {
    describe_counter!(ACQUIRE_TOTAL, "Acquire attempts by result");
    describe_counter!(RELEASE_TOTAL, "Release attempts by result");
    describe_counter!(SET_TOTAL, "Set operations by result");
    describe_counter!(RENEW_TOTAL, "Session renewals by result");
    describe_counter!(DESTROY_TOTAL, "Session destroy requests by result");
    describe_counter!(EXPIRED_TOTAL, "Sessions reclaimed by lease expiry");
    describe_gauge!(SESSIONS_ACTIVE, "Number of live sessions");
}

/// Record the outcome of a lock operation
pub(crate) fn record_operation(name: &'static str, success: bool) {
    let result = if success { "success" } else { "failure" };
    counter!(name, "result" => result).increment(1);
}

pub(crate) fn record_expired() {
    counter!(EXPIRED_TOTAL).increment(1);
}

pub(crate) fn set_active_sessions(count: usize) {
    gauge!(SESSIONS_ACTIVE).set(count as f64);
}
