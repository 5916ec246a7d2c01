use crate::comment::index::comment_routes;
use crate::news::index::news_routes;
use crate::note::index::note_routes;
use crate::user::index::user_routes;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use serde_json::json;

use crate::utils::response::service_name;

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Service is healthy",
        "httpStatusCode": StatusCode::OK.as_u16(),
        "service": service_name(),
    }))
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health));
    cfg.configure(user_routes);
    cfg.configure(news_routes);
    cfg.configure(comment_routes);
    cfg.configure(note_routes);
}
