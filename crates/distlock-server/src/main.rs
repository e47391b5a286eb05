//! Main entry point for the distlock server.

use distlock_core::LeaseManager;
use distlock_server::{
    Configuration, metrics,
    startup::{self, ServerSettings},
};
use tracing::info;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let configuration = Configuration::new()?;

    let logging_config = configuration.logging_config();
    let _logging_guard = startup::init_logging(&logging_config)?;

    let metrics_handle = metrics::init_metrics(configuration.metrics_enabled())?;

    let policy = configuration.lease_policy()?;
    let settings = ServerSettings {
        address: configuration.server_address(),
        port: configuration.server_port(),
        workers: configuration.server_workers(),
    };

    let lease_manager = LeaseManager::new()?;

    info!(
        address = %settings.address,
        port = settings.port,
        duration_unit = %policy.unit,
        max_duration = ?policy.max_duration,
        "Starting distlock server"
    );

    startup::main_server(lease_manager.clone(), policy, metrics_handle, settings)?.await?;

    let dropped = lease_manager.shutdown();
    info!(sessions = dropped, "Server stopped, pending leases cancelled");

    Ok(())
}
