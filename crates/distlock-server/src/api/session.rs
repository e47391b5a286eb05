//! Session HTTP handlers
//!
//! Both endpoints answer with an empty 200 whether or not the session
//! existed.

use actix_web::{HttpResponse, web};

use distlock_core::LeaseManager;

use crate::error::AppError;
use crate::model::lease::LeasePolicy;

/// POST /session/renew/{sessionId}/{duration}
pub async fn renew(
    lease_manager: web::Data<LeaseManager>,
    policy: web::Data<LeasePolicy>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (session_id, duration) = path.into_inner();
    let ttl = policy.parse(&duration)?;

    lease_manager.renew(&session_id, ttl);
    Ok(HttpResponse::Ok().finish())
}

/// POST /session/destroy/{sessionId}
pub async fn destroy(
    lease_manager: web::Data<LeaseManager>,
    path: web::Path<String>,
) -> HttpResponse {
    lease_manager.destroy(&path.into_inner());
    HttpResponse::Ok().finish()
}
