//! HTTP server setup

use actix_web::{App, HttpServer, dev::Server, middleware::Logger, web};
use metrics_exporter_prometheus::PrometheusHandle;

use distlock_core::LeaseManager;

use crate::{api::route::routes, metrics::metrics_handler, model::lease::LeasePolicy};

/// Bind settings for the main server
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub address: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Creates and binds the lock service HTTP server.
///
/// `/metrics` is only mounted when a Prometheus handle is supplied.
pub fn main_server(
    lease_manager: LeaseManager,
    policy: LeasePolicy,
    metrics: Option<PrometheusHandle>,
    settings: ServerSettings,
) -> Result<Server, std::io::Error> {
    let mut server = HttpServer::new(move || {
        let mut app = App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(lease_manager.clone()))
            .app_data(web::Data::new(policy));

        if let Some(handle) = metrics.clone() {
            app = app
                .app_data(web::Data::new(handle))
                .route("/metrics", web::get().to(metrics_handler));
        }

        app.service(routes())
    });

    if let Some(workers) = settings.workers {
        server = server.workers(workers);
    }

    Ok(server.bind((settings.address, settings.port))?.run())
}
