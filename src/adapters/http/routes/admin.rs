use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::CookieJar;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::{
    adapters::http::{
        app_state::AppState,
        auth::{access_cookie, cleared_access_cookie, require_admin},
    },
    app_error::AppResult,
    use_cases::admin::AdminProfile,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(get_me))
}

#[derive(Deserialize)]
struct LoginPayload {
    email: String,
    password: String,
}

#[derive(Serialize)]
struct LoginResponse {
    admin: AdminProfile,
    token: String,
}

async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> AppResult<impl IntoResponse> {
    let result = app_state
        .admin_use_cases
        .login(&payload.email, &SecretString::new(payload.password.into()))
        .await?;

    let mut headers = HeaderMap::new();
    headers.append(SET_COOKIE, access_cookie(result.token.clone(), &app_state)?);

    Ok((
        StatusCode::OK,
        headers,
        Json(LoginResponse {
            admin: result.admin,
            token: result.token,
        }),
    ))
}

async fn logout(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let mut headers = HeaderMap::new();
    headers.append(SET_COOKIE, cleared_access_cookie(&app_state)?);
    Ok((StatusCode::NO_CONTENT, headers))
}

async fn get_me(
    State(app_state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    let admin = require_admin(&jar, &headers, &app_state).await?;
    Ok(Json(admin))
}
