use axum::http::{HeaderMap, HeaderValue, header::AUTHORIZATION};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::{
    adapters::http::app_state::AppState,
    app_error::{AppError, AppResult},
    use_cases::admin::AdminProfile,
};

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Resolves the calling admin from the `access_token` cookie or a `Bearer` header.
pub async fn require_admin(
    jar: &CookieJar,
    headers: &HeaderMap,
    app_state: &AppState,
) -> AppResult<AdminProfile> {
    let token = bearer_token(headers)
        .or_else(|| jar.get(ACCESS_TOKEN_COOKIE).map(|c| c.value().to_owned()))
        .ok_or(AppError::InvalidCredentials)?;
    app_state.admin_use_cases.authenticate(&token).await
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_owned())
}

pub fn access_cookie(token: String, app_state: &AppState) -> AppResult<HeaderValue> {
    let cookie = Cookie::build((ACCESS_TOKEN_COOKIE, token))
        .http_only(true)
        .secure(app_state.config.secure_cookies())
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(app_state.config.access_token_ttl)
        .build();
    to_header(cookie)
}

pub fn cleared_access_cookie(app_state: &AppState) -> AppResult<HeaderValue> {
    let cookie = Cookie::build((ACCESS_TOKEN_COOKIE, ""))
        .http_only(true)
        .secure(app_state.config.secure_cookies())
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::seconds(0))
        .build();
    to_header(cookie)
}

fn to_header(cookie: Cookie<'_>) -> AppResult<HeaderValue> {
    cookie
        .to_string()
        .parse()
        .map_err(|_| AppError::Internal("cookie is not a valid header value".into()))
}
