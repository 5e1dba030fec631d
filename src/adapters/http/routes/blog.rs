use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    adapters::http::{app_state::AppState, auth::require_admin},
    app_error::AppResult,
    use_cases::blog::{CreateBlogPostInput, UpdateBlogPostInput},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route(
            "/{id}",
            get(get_post).patch(update_post).delete(delete_post),
        )
}

#[derive(Deserialize)]
struct CreatePostPayload {
    #[serde(default)]
    title: String,
    summary: Option<String>,
    #[serde(default)]
    content: String,
    author: Option<String>,
    image_url: Option<String>,
}

#[derive(Deserialize)]
struct UpdatePostPayload {
    title: Option<String>,
    summary: Option<String>,
    content: Option<String>,
    author: Option<String>,
    image_url: Option<String>,
}

async fn list_posts(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let posts = app_state.blog_use_cases.list().await?;
    Ok(Json(posts))
}

async fn get_post(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let post = app_state.blog_use_cases.get(id).await?;
    Ok(Json(post))
}

async fn create_post(
    State(app_state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    Json(payload): Json<CreatePostPayload>,
) -> AppResult<impl IntoResponse> {
    require_admin(&jar, &headers, &app_state).await?;
    let post = app_state
        .blog_use_cases
        .create(CreateBlogPostInput {
            title: payload.title,
            summary: payload.summary,
            content: payload.content,
            author: payload.author,
            image_url: payload.image_url,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(post)))
}

async fn update_post(
    State(app_state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePostPayload>,
) -> AppResult<impl IntoResponse> {
    require_admin(&jar, &headers, &app_state).await?;
    let post = app_state
        .blog_use_cases
        .update(
            id,
            UpdateBlogPostInput {
                title: payload.title,
                summary: payload.summary,
                content: payload.content,
                author: payload.author,
                image_url: payload.image_url,
            },
        )
        .await?;
    Ok(Json(post))
}

async fn delete_post(
    State(app_state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    require_admin(&jar, &headers, &app_state).await?;
    app_state.blog_use_cases.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
