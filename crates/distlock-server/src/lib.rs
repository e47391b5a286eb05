// HTTP front end for the distlock advisory lock service

pub mod api; // API handlers and routes
pub mod error; // Error handling and types
pub mod metrics; // Prometheus exporter
pub mod model; // Configuration and wire models
pub mod startup; // Application startup utilities

pub use model::config::{Cli, Configuration};
pub use model::lease::{DurationUnit, LeasePolicy};
