// src/handlers/auth_handlers.rs
use actix_web::{get, post, web, HttpResponse};

use crate::dtos::auth_dtos::LoginIn;
use crate::error::AppError;
use crate::handlers::{html, redirect};
use crate::middleware::auth_extractor::{removal_cookie, session_cookie, SessionCookie};
use crate::services::auth_services::{AuthError, AuthService};
use crate::views::LOGIN_ERROR_MESSAGE;
use crate::AppState;

/// GET /login
#[get("/login")]
pub async fn login_page(
    state: web::Data<AppState>,
    auth: web::Data<AuthService>,
    cookie: SessionCookie,
) -> Result<HttpResponse, AppError> {
    if auth.is_authenticated(cookie.id())? {
        return Ok(redirect("/dashboard"));
    }
    Ok(html(state.views.login(None)?))
}

/// POST /login
/// Opens an admin session when the password matches, otherwise shows the
/// form again with an error.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    auth: web::Data<AuthService>,
    cookie: SessionCookie,
    body: web::Form<LoginIn>,
) -> Result<HttpResponse, AppError> {
    match auth.login(&body.password, cookie.id()) {
        Ok(session_id) => {
            let mut resp = redirect("/dashboard");
            resp.add_cookie(&session_cookie(&session_id))
                .map_err(|e| AppError::Internal(e.to_string()))?;
            Ok(resp)
        }
        Err(AuthError::InvalidPassword) => Ok(html(state.views.login(Some(LOGIN_ERROR_MESSAGE))?)),
        Err(e) => Err(e.into()),
    }
}

/// GET /logout
#[get("/logout")]
pub async fn logout(
    auth: web::Data<AuthService>,
    cookie: SessionCookie,
) -> Result<HttpResponse, AppError> {
    auth.logout(cookie.id())?;
    let mut resp = redirect("/");
    resp.add_cookie(&removal_cookie())
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(resp)
}
