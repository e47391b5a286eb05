//! Application startup utilities module.

mod http;
mod logging;

pub use http::{ServerSettings, main_server};
pub use logging::{LogRotation, LoggingConfig, LoggingGuard, init_logging};
