//! Lease-based exclusive locks over named keys.
//!
//! This crate holds the state machine of the distlock service:
//! - `store`: key-value/lock table
//! - `session`: session registry and expiry timer handles
//! - `lease`: the lease manager performing atomic two-table transitions
//! - `metrics`: counters and gauges published by the lease manager
//!
//! Both tables live behind a single reader/writer guard owned by
//! [`LeaseManager`]; nothing outside this crate can reach them directly.

pub mod error;
pub mod lease;
pub mod metrics;
pub mod model;
pub mod session;
pub mod store;

pub use error::{DistlockError, Result};
pub use lease::LeaseManager;
pub use model::{AcquireOutcome, SessionId};
pub use session::{Session, SessionRegistry};
pub use store::{KeyTable, LockableValue};
