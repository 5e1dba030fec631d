use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, patch, post},
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    adapters::http::{app_state::AppState, auth::require_admin},
    app_error::{AppError, AppResult},
    domain::entities::invoice_status::InvoiceStatus,
    use_cases::subscriber::SignupInput,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(signup).get(list_subscribers))
        .route("/reconcile", post(reconcile))
        .route("/reminders", post(send_reminders))
        .route("/{id}", get(get_subscriber).delete(delete_subscriber))
        .route("/{id}/status", patch(update_status))
}

// Required text fields default to empty so validation can answer with a 400.
#[derive(Deserialize)]
struct SignupPayload {
    #[serde(default)]
    full_name: String,
    #[serde(default)]
    email: String,
    phone: Option<String>,
    company: Option<String>,
    #[serde(default)]
    plan: String,
    payment_method: Option<String>,
    payment_reference: Option<String>,
}

#[derive(Deserialize)]
struct StatusPayload {
    status: String,
}

async fn signup(
    State(app_state): State<AppState>,
    Json(payload): Json<SignupPayload>,
) -> AppResult<impl IntoResponse> {
    let subscriber = app_state
        .subscriber_use_cases
        .signup(SignupInput {
            full_name: payload.full_name,
            email: payload.email,
            phone: payload.phone,
            company: payload.company,
            plan: payload.plan,
            payment_method: payload.payment_method,
            payment_reference: payload.payment_reference,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(subscriber)))
}

async fn list_subscribers(
    State(app_state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    require_admin(&jar, &headers, &app_state).await?;
    let subscribers = app_state.subscriber_use_cases.list().await?;
    Ok(Json(subscribers))
}

async fn get_subscriber(
    State(app_state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    require_admin(&jar, &headers, &app_state).await?;
    let subscriber = app_state.subscriber_use_cases.get(id).await?;
    Ok(Json(subscriber))
}

async fn update_status(
    State(app_state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusPayload>,
) -> AppResult<impl IntoResponse> {
    let admin = require_admin(&jar, &headers, &app_state).await?;
    let status: InvoiceStatus = payload.status.parse().map_err(AppError::InvalidInput)?;
    tracing::info!(admin_id = %admin.id, subscriber_id = %id, status = %status, "Admin changed invoice status");
    let subscriber = app_state
        .subscriber_use_cases
        .update_status(id, status)
        .await?;
    Ok(Json(subscriber))
}

async fn delete_subscriber(
    State(app_state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    require_admin(&jar, &headers, &app_state).await?;
    app_state.subscriber_use_cases.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn reconcile(
    State(app_state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    require_admin(&jar, &headers, &app_state).await?;
    let demoted = app_state.subscriber_use_cases.reconcile().await?;
    Ok(Json(serde_json::json!({ "demoted": demoted })))
}

async fn send_reminders(
    State(app_state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    require_admin(&jar, &headers, &app_state).await?;
    let report = app_state.subscriber_use_cases.send_due_reminders().await?;
    Ok(Json(report))
}
