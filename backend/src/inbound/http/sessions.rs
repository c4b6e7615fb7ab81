//! Session endpoints: login, refresh and logout.
//!
//! Tokens travel as `HttpOnly` cookies so browser scripts never see them.
//! Logout is purely client-side state removal; see
//! [`crate::domain::SessionService`] for the protocol rules.

use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::{HttpRequest, HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::auth::{ACCESS_COOKIE, REFRESH_COOKIE};
use super::error::ApiResult;
use super::state::HttpState;
use crate::domain::token::{ACCESS_TTL_SECS, REFRESH_TTL_SECS};
use crate::domain::{Error, LoginCredentials};

/// Credentials posted to `/api/login`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub name: String,
    pub password: String,
}

/// Minimal acknowledgement body shared by the session endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct Acknowledged {
    pub success: bool,
}

impl Acknowledged {
    fn ok() -> Self {
        Self { success: true }
    }
}

fn session_cookie(name: &str, value: String, ttl_secs: i64, secure: bool) -> Cookie<'_> {
    Cookie::build(name, value)
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::seconds(ttl_secs))
        .finish()
}

fn expired_cookie(name: &str, secure: bool) -> Cookie<'_> {
    session_cookie(name, String::new(), 0, secure)
}

/// Authenticate and set the access/refresh cookie pair.
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session established", body = Acknowledged),
        (status = 401, description = "Unknown name or wrong password"),
    ),
    tag = "sessions"
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from_parts(&payload.name, &payload.password)
        .map_err(Error::from)?;
    let pair = state.sessions.issue_session(&credentials).await?;
    Ok(HttpResponse::Ok()
        .cookie(session_cookie(
            ACCESS_COOKIE,
            pair.access_token,
            ACCESS_TTL_SECS,
            state.cookie_secure,
        ))
        .cookie(session_cookie(
            REFRESH_COOKIE,
            pair.refresh_token,
            REFRESH_TTL_SECS,
            state.cookie_secure,
        ))
        .json(Acknowledged::ok()))
}

/// Redeem the refresh cookie for a fresh access cookie.
///
/// A missing cookie is unauthorised; a presented-but-rejected cookie is
/// forbidden, which tells the client to re-login rather than retry.
#[utoipa::path(
    post,
    path = "/api/refresh",
    responses(
        (status = 200, description = "Access token renewed", body = Acknowledged),
        (status = 401, description = "No refresh cookie presented"),
        (status = 403, description = "Refresh token expired or rejected"),
    ),
    tag = "sessions"
)]
#[post("/refresh")]
pub async fn refresh(state: web::Data<HttpState>, req: HttpRequest) -> ApiResult<HttpResponse> {
    let cookie = req
        .cookie(REFRESH_COOKIE)
        .ok_or_else(|| Error::unauthorized("refresh cookie missing"))?;
    let access_token = state.sessions.refresh(cookie.value()).await?;
    Ok(HttpResponse::Ok()
        .cookie(session_cookie(
            ACCESS_COOKIE,
            access_token,
            ACCESS_TTL_SECS,
            state.cookie_secure,
        ))
        .json(Acknowledged::ok()))
}

/// Clear both session cookies.
///
/// The server keeps no session table, so this only instructs the browser to
/// drop its copies; outstanding tokens stay valid until expiry.
#[utoipa::path(
    post,
    path = "/api/logout",
    responses((status = 200, description = "Cookies cleared", body = Acknowledged)),
    tag = "sessions"
)]
#[post("/logout")]
pub async fn logout(state: web::Data<HttpState>) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(expired_cookie(ACCESS_COOKIE, state.cookie_secure))
        .cookie(expired_cookie(REFRESH_COOKIE, state.cookie_secure))
        .json(Acknowledged::ok())
}
