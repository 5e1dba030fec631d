pub mod admin;
pub mod blog;
pub mod subscriber;

use axum::{Json, Router, response::IntoResponse, routing::get};

use crate::adapters::http::app_state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/subscribers", subscriber::router())
        .nest("/admin", admin::router())
        .nest("/blogs", blog::router())
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
