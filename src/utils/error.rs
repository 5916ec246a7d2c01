use actix_web::http::header::LOCATION;
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

use crate::utils::response::service_name;

#[derive(Debug, Error)]
pub enum CustomError {
    #[error("Bad Request: {0}")]
    BadRequestError(String),

    #[error("Conflict: {0}")]
    ConflictError(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Not Found: {0}")]
    NotFoundError(String),

    #[error("Validation Error: {0}")]
    ValidationError(String),

    /// Anonymous access to a protected page; `location` is the login URL
    /// carrying the `next` parameter.
    #[error("Login required")]
    LoginRequired { location: String },
}

impl CustomError {
    pub fn not_found(what: &str) -> Self {
        CustomError::NotFoundError(format!("{} not found", what))
    }

    pub fn storage(action: &str, err: impl std::fmt::Display) -> Self {
        log::error!("storage failure while trying to {}: {}", action, err);
        CustomError::InternalServerError(format!("Failed to {}", action))
    }

    fn code(&self) -> &'static str {
        match *self {
            CustomError::BadRequestError(..) => "BAD_REQUEST_ERROR",
            CustomError::ConflictError(..) => "CONFLICT_ERROR",
            CustomError::InternalServerError(..) => "INTERNAL_SERVER_ERROR",
            CustomError::NotFoundError(..) => "NOT_FOUND_ERROR",
            CustomError::ValidationError(..) => "VALIDATION_ERROR",
            CustomError::LoginRequired { .. } => "LOGIN_REQUIRED",
        }
    }
}

impl ResponseError for CustomError {
    fn status_code(&self) -> StatusCode {
        match *self {
            CustomError::BadRequestError(..) => StatusCode::BAD_REQUEST,
            CustomError::ConflictError(..) => StatusCode::CONFLICT,
            CustomError::InternalServerError(..) => StatusCode::INTERNAL_SERVER_ERROR,
            CustomError::NotFoundError(..) => StatusCode::NOT_FOUND,
            CustomError::ValidationError(..) => StatusCode::BAD_REQUEST,
            CustomError::LoginRequired { .. } => StatusCode::FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let CustomError::LoginRequired { location } = self {
            return HttpResponse::Found()
                .insert_header((LOCATION, location.as_str()))
                .finish();
        }

        let error_message = json!({
            "success": false,
            "message": self.to_string(),
            "httpStatusCode": self.status_code().as_u16(),
            "error": self.code(),
            "service": service_name(),
        });

        HttpResponse::build(self.status_code()).json(error_message)
    }
}
