pub mod auth;
pub mod error_handler;
pub mod not_found;
pub mod ownership;

use actix_web::http::StatusCode;
use actix_web::middleware::ErrorHandlers;

/// Envelope for errors the handlers never see: unmatched routes, wrong
/// methods, rejected payloads.
pub fn error_handlers<B: 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new()
        .handler(StatusCode::NOT_FOUND, not_found::not_found)
        .default_handler(error_handler::handle_error)
}
