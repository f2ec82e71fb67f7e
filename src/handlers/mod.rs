pub mod auth_handlers;
pub mod dashboard_handlers;
pub mod public_handlers;

use actix_web::http::header;
use actix_web::{web, HttpResponse};

/// Registers every route of the site.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(public_handlers::index)
        .service(public_handlers::serve_upload)
        .service(auth_handlers::login_page)
        .service(auth_handlers::login)
        .service(auth_handlers::logout)
        .service(dashboard_handlers::dashboard)
        .service(dashboard_handlers::update_dashboard);
}

pub(crate) fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(mime::TEXT_HTML_UTF_8)
        .body(body)
}

pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}
