// src/error.rs
use actix_web::http::{header, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use log::error;
use thiserror::Error;

use crate::dtos::nested_form::FormError;
use crate::repositories::profile_store::StoreError;
use crate::services::auth_services::AuthError;
use crate::services::session_services::SessionError;
use crate::services::upload_services::UploadError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("login required")]
    LoginRequired,
    #[error("storage unavailable: {0}")]
    Storage(#[from] StoreError),
    #[error("upload failed: {0}")]
    Upload(#[from] UploadError),
    #[error("invalid form: {0}")]
    Form(#[from] FormError),
    #[error("template rendering failed: {0}")]
    Render(#[from] minijinja::Error),
    #[error("session error: {0}")]
    Session(#[from] SessionError),
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::LoginRequired => StatusCode::FOUND,
            AppError::Form(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::LoginRequired => HttpResponse::Found()
                .insert_header((header::LOCATION, "/login"))
                .finish(),
            AppError::Form(e) => {
                error!("Rejected form submission: {}", e);
                HttpResponse::BadRequest()
                    .content_type(mime::TEXT_PLAIN_UTF_8)
                    .body("Bad Request")
            }
            other => {
                error!("Request failed: {}", other);
                HttpResponse::InternalServerError()
                    .content_type(mime::TEXT_PLAIN_UTF_8)
                    .body("Internal Server Error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_required_redirects() {
        let resp = AppError::LoginRequired.error_response();
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/login");
    }

    #[test]
    fn storage_errors_are_generic_500s() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let err = AppError::from(StoreError::from(io));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
