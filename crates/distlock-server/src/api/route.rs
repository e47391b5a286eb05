// Lock service route configuration

use actix_web::web;

use super::{kv, session, status};

/// Key/value and lock endpoints
pub fn kv_routes() -> actix_web::Scope {
    web::scope("/kv")
        .route("/acquire/{key}/{duration}", web::post().to(kv::acquire))
        .route("/release/{key}/{session_id}", web::post().to(kv::release))
        .route("/set/{key}", web::post().to(kv::set))
        .route("/get/{key}", web::get().to(kv::get))
        .route("/keys", web::get().to(kv::keys))
}

/// Session lifecycle endpoints
pub fn session_routes() -> actix_web::Scope {
    web::scope("/session")
        .route("/renew/{session_id}/{duration}", web::post().to(session::renew))
        .route("/destroy/{session_id}", web::post().to(session::destroy))
}

/// All lock service routes
pub fn routes() -> actix_web::Scope {
    web::scope("")
        .route("/status", web::get().to(status::status))
        .service(kv_routes())
        .service(session_routes())
}
