use actix_web::HttpResponse;

use crate::model::response::StatusResult;

/// GET /status
pub async fn status() -> HttpResponse {
    HttpResponse::Ok().json(StatusResult { running: true })
}
