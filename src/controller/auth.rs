use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::header::LOCATION;
use actix_web::web::{self, Data};
use actix_web::{HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::controller::response::{html, redirect};
use crate::paths;
use crate::session::{SESSION_COOKIE, Session, SessionStore};
use crate::storage::Storage;
use crate::view::login::{LoginMessage, LoginStage, render_login_page};

pub const OTP_SENT_MESSAGE: &str = "Check your email for the OTP!";

#[derive(Deserialize)]
pub struct EmailForm {
    pub email: String,
}

#[derive(Deserialize)]
pub struct VerifyForm {
    pub email: String,
    pub code: String,
}

/// Session for the request cookie, refreshed on use. Any failure reads as signed out.
pub async fn current_session(
    req: &HttpRequest,
    sessions: &SessionStore,
    storage: &dyn Storage,
) -> Option<Session> {
    let token = req.cookie(SESSION_COOKIE)?.value().to_string();
    match sessions.load(storage, &token).await {
        Ok(Some(session)) => {
            sessions.refresh(&token).await;
            Some(session)
        }
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(error = %e, "session could not be loaded, treating as signed out");
            None
        }
    }
}

/// A signed-in session, or the redirect to the login page.
///
/// # Errors
///
/// Returns the redirect response when there is no usable session
pub async fn require_session(
    req: &HttpRequest,
    sessions: &SessionStore,
    storage: &dyn Storage,
) -> Result<Session, HttpResponse> {
    current_session(req, sessions, storage)
        .await
        .ok_or_else(|| redirect(paths::LOGIN))
}

/// Like [`require_session`], but accounts without a player profile are sent to create one.
///
/// # Errors
///
/// Returns the redirect response to the login or create-player page
pub async fn require_player(
    req: &HttpRequest,
    sessions: &SessionStore,
    storage: &dyn Storage,
) -> Result<Session, HttpResponse> {
    let session = require_session(req, sessions, storage).await?;
    if session.player.is_none() {
        return Err(redirect(paths::CREATE_PLAYER));
    }
    Ok(session)
}

pub async fn login_page(
    req: HttpRequest,
    sessions: Data<SessionStore>,
    storage: Data<dyn Storage>,
) -> HttpResponse {
    if current_session(&req, &sessions, storage.get_ref()).await.is_some() {
        return redirect(paths::HOME);
    }
    html(render_login_page(LoginStage::Email, "", None))
}

pub async fn send_otp(
    form: web::Form<EmailForm>,
    sessions: Data<SessionStore>,
    storage: Data<dyn Storage>,
) -> HttpResponse {
    match sessions.send_otp(storage.get_ref(), &form.email).await {
        Ok(()) => html(render_login_page(
            LoginStage::Code,
            form.email.trim(),
            Some(&LoginMessage::Success(OTP_SENT_MESSAGE.to_string())),
        )),
        Err(e) => {
            tracing::info!(error = %e, "one-time passcode not sent");
            html(render_login_page(
                LoginStage::Email,
                form.email.trim(),
                Some(&LoginMessage::Error(e.to_string())),
            ))
        }
    }
}

pub async fn verify_otp(
    form: web::Form<VerifyForm>,
    sessions: Data<SessionStore>,
    storage: Data<dyn Storage>,
) -> HttpResponse {
    match sessions
        .verify_otp(storage.get_ref(), &form.email, &form.code)
        .await
    {
        Ok(token) => {
            let cookie = Cookie::build(SESSION_COOKIE, token)
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .finish();
            HttpResponse::SeeOther()
                .insert_header((LOCATION, paths::AUTH_CALLBACK))
                .cookie(cookie)
                .finish()
        }
        Err(e) => html(render_login_page(
            LoginStage::Code,
            form.email.trim(),
            Some(&LoginMessage::Error(e.to_string())),
        )),
    }
}

pub async fn logout(req: HttpRequest, sessions: Data<SessionStore>) -> HttpResponse {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        sessions.clear(cookie.value()).await;
    }
    let mut removal = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    removal.make_removal();
    HttpResponse::SeeOther()
        .insert_header((LOCATION, paths::LOGIN))
        .cookie(removal)
        .finish()
}

/// Where a freshly signed-in browser lands: home, or create-player on first login.
pub async fn auth_callback(
    req: HttpRequest,
    sessions: Data<SessionStore>,
    storage: Data<dyn Storage>,
) -> HttpResponse {
    match current_session(&req, &sessions, storage.get_ref()).await {
        Some(session) if session.player.is_some() => redirect(paths::HOME),
        Some(_) => redirect(paths::CREATE_PLAYER),
        None => redirect(paths::LOGIN),
    }
}
