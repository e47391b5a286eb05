// Prometheus exporter setup and the /metrics endpoint

use actix_web::{HttpResponse, http::header::ContentType, web};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Install the global Prometheus recorder and describe the lock metrics.
///
/// Returns `None` when metrics are disabled. Only one recorder can be
/// installed per process.
pub fn init_metrics(enabled: bool) -> Result<Option<PrometheusHandle>, BuildError> {
    if !enabled {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    distlock_core::metrics::describe_metrics();
    tracing::info!("Prometheus metrics recorder installed");

    Ok(Some(handle))
}

/// GET /metrics
pub async fn metrics_handler(handle: web::Data<PrometheusHandle>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(handle.render())
}
