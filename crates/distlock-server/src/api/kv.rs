//! Key/value and lock HTTP handlers

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use distlock_core::LeaseManager;

use crate::error::AppError;
use crate::model::lease::LeasePolicy;
use crate::model::response::{AcquireResult, GetResult, ReleaseResult, SetResult};

/// Query parameters for acquire
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AcquireQueryParams {
    #[serde(default)]
    pub value: String,
}

/// Query parameters for set
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SetQueryParams {
    #[serde(default)]
    pub value: String,
    pub session_id: Option<String>,
}

/// Query parameters for key listing
#[derive(Debug, Clone, Deserialize, Default)]
pub struct KeysQueryParams {
    #[serde(default)]
    pub prefix: String,
}

/// POST /kv/acquire/{key}/{duration}
/// Locks a key under a fresh session
pub async fn acquire(
    lease_manager: web::Data<LeaseManager>,
    policy: web::Data<LeasePolicy>,
    path: web::Path<(String, String)>,
    query: web::Query<AcquireQueryParams>,
) -> Result<HttpResponse, AppError> {
    let (key, duration) = path.into_inner();
    let ttl = policy.parse(&duration)?;

    let outcome = lease_manager.acquire(&key, &query.value, ttl);
    Ok(HttpResponse::Ok().json(AcquireResult::from(outcome)))
}

/// POST /kv/release/{key}/{sessionId}
pub async fn release(
    lease_manager: web::Data<LeaseManager>,
    path: web::Path<(String, String)>,
) -> HttpResponse {
    let (key, session_id) = path.into_inner();
    let success = lease_manager.release(&key, &session_id);
    HttpResponse::Ok().json(ReleaseResult { success })
}

/// POST /kv/set/{key}
/// Writes through the owning session, or creates an unheld key when no
/// session is given
pub async fn set(
    lease_manager: web::Data<LeaseManager>,
    path: web::Path<String>,
    query: web::Query<SetQueryParams>,
) -> HttpResponse {
    let key = path.into_inner();
    let session_id = query.session_id.as_deref().filter(|id| !id.is_empty());

    let success = lease_manager.set(&key, &query.value, session_id);
    HttpResponse::Ok().json(SetResult { success })
}

/// GET /kv/get/{key}
pub async fn get(lease_manager: web::Data<LeaseManager>, path: web::Path<String>) -> HttpResponse {
    let key = path.into_inner();
    let result = match lease_manager.get(&key) {
        Some(value) => GetResult::found(key, value),
        None => GetResult::missing(),
    };
    HttpResponse::Ok().json(result)
}

/// GET /kv/keys?prefix=
pub async fn keys(
    lease_manager: web::Data<LeaseManager>,
    query: web::Query<KeysQueryParams>,
) -> HttpResponse {
    HttpResponse::Ok().json(lease_manager.list_keys(&query.prefix))
}
