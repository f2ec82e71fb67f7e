// src/middleware/auth_extractor.rs
use actix_web::cookie::{Cookie, SameSite};
use actix_web::{dev::Payload, web, Error, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use log::error;

use crate::error::AppError;
use crate::services::auth_services::AuthService;

pub const SESSION_COOKIE: &str = "portfolio_sid";

/// Raw session id carried by the request, not yet checked against the store.
pub struct SessionCookie(pub Option<String>);

impl SessionCookie {
    pub fn id(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl FromRequest for SessionCookie {
    type Error = Error;
    type Future = Ready<Result<SessionCookie, Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let id = req
            .cookie(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty());
        ready(Ok(SessionCookie(id)))
    }
}

/// Guard for dashboard routes. Extraction fails with a redirect to `/login`
/// unless the request carries a logged-in session, so the handler body never
/// runs for anonymous callers.
pub struct AdminSession;

impl FromRequest for AdminSession {
    type Error = AppError;
    type Future = Ready<Result<AdminSession, AppError>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(auth) = req.app_data::<web::Data<AuthService>>() else {
            error!("AuthService is not registered as app data");
            return ready(Err(AppError::Internal("auth service missing".to_string())));
        };

        let Some(session_id) = req.cookie(SESSION_COOKIE).map(|c| c.value().to_string()) else {
            return ready(Err(AppError::LoginRequired));
        };

        let result = match auth.is_authenticated(Some(&session_id)) {
            Ok(true) => Ok(AdminSession),
            Ok(false) => Err(AppError::LoginRequired),
            Err(e) => Err(e.into()),
        };
        ready(result)
    }
}

pub fn session_cookie(id: &str) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, id.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = session_cookie("");
    cookie.make_removal();
    cookie
}
