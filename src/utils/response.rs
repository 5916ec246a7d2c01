use std::sync::OnceLock;

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::LOCATION;
use serde_json::{Value, json};

use crate::config::DEFAULT_SERVICE_NAME;

static SERVICE_NAME: OnceLock<String> = OnceLock::new();

/// Fix the `service` reported in every envelope. Called once at startup with
/// `AppConfig::service_name`; later calls are ignored.
pub fn init_service_name(name: &str) {
    if SERVICE_NAME.set(name.to_string()).is_err() {
        log::debug!("service name already set");
    }
}

pub fn service_name() -> &'static str {
    SERVICE_NAME
        .get()
        .map(String::as_str)
        .unwrap_or(DEFAULT_SERVICE_NAME)
}

/// Render a page document: the standard envelope around the page context.
pub fn render(message: &str, data: Value) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": message,
        "httpStatusCode": StatusCode::OK.as_u16(),
        "service": service_name(),
        "data": data,
    }))
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((LOCATION, location))
        .finish()
}
