// src/handlers/public_handlers.rs
use actix_web::http::header;
use actix_web::{get, web, HttpResponse};

use crate::error::AppError;
use crate::handlers::html;
use crate::services::upload_services::content_type_for;
use crate::AppState;

/// GET /
/// Public portfolio page.
#[get("/")]
pub async fn index(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let profile = state.store.fetch_or_seed().await?;
    Ok(html(state.views.index(&profile)?))
}

/// GET /uploads/{filename}
/// Serves a stored hero image, sandboxed and with sniffing disabled.
#[get("/uploads/{filename}")]
pub async fn serve_upload(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let filename = path.into_inner();
    let Some(file_path) = state.uploads.resolve(&filename) else {
        return HttpResponse::NotFound().finish();
    };

    match tokio::fs::read(&file_path).await {
        Ok(data) => HttpResponse::Ok()
            .content_type(content_type_for(&file_path))
            .insert_header((header::CONTENT_SECURITY_POLICY, "sandbox"))
            .insert_header((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
            .body(data),
        Err(_) => HttpResponse::NotFound().finish(),
    }
}
