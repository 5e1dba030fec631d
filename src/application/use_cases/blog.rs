use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::{
        clock::Clock,
        validators::{optional_text, required_text},
    },
    domain::entities::blog_post::BlogPost,
};

const MAX_TITLE_CHARS: usize = 200;
const MAX_SUMMARY_CHARS: usize = 500;
const MAX_CONTENT_CHARS: usize = 100_000;

#[async_trait]
pub trait BlogRepo: Send + Sync {
    async fn create(&self, post: &BlogPostFields, now: NaiveDateTime) -> AppResult<BlogPost>;
    /// Newest first.
    async fn list(&self) -> AppResult<Vec<BlogPost>>;
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<BlogPost>>;
    async fn update(&self, id: Uuid, post: &BlogPostFields, now: NaiveDateTime) -> AppResult<Option<BlogPost>>;
    /// Returns false when no row matched.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Validated, complete set of writable fields.
#[derive(Debug, Clone, PartialEq)]
pub struct BlogPostFields {
    pub title: String,
    pub summary: Option<String>,
    pub content: String,
    pub author: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CreateBlogPostInput {
    pub title: String,
    pub summary: Option<String>,
    pub content: String,
    pub author: Option<String>,
    pub image_url: Option<String>,
}

/// Partial update. `None` leaves a field unchanged; an empty string clears an optional field.
#[derive(Debug, Clone, Default)]
pub struct UpdateBlogPostInput {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Clone)]
pub struct BlogUseCases {
    repo: Arc<dyn BlogRepo>,
    clock: Arc<dyn Clock>,
}

impl BlogUseCases {
    pub fn new(repo: Arc<dyn BlogRepo>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> AppResult<Vec<BlogPost>> {
        self.repo.list().await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> AppResult<BlogPost> {
        self.repo.get_by_id(id).await?.ok_or(AppError::NotFound)
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateBlogPostInput) -> AppResult<BlogPost> {
        let fields = BlogPostFields {
            title: required_text("title", &input.title, MAX_TITLE_CHARS)?,
            summary: optional_text("summary", input.summary.as_deref(), MAX_SUMMARY_CHARS)?,
            content: required_text("content", &input.content, MAX_CONTENT_CHARS)?,
            author: optional_text("author", input.author.as_deref(), MAX_TITLE_CHARS)?,
            image_url: validate_image_url(input.image_url.as_deref())?,
        };
        let post = self.repo.create(&fields, self.clock.now()).await?;
        info!(post_id = %post.id, "Blog post created");
        Ok(post)
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: Uuid, input: UpdateBlogPostInput) -> AppResult<BlogPost> {
        let current = self.get(id).await?;
        let fields = BlogPostFields {
            title: match input.title {
                Some(title) => required_text("title", &title, MAX_TITLE_CHARS)?,
                None => current.title,
            },
            summary: match input.summary {
                Some(summary) => optional_text("summary", Some(summary.as_str()), MAX_SUMMARY_CHARS)?,
                None => current.summary,
            },
            content: match input.content {
                Some(content) => required_text("content", &content, MAX_CONTENT_CHARS)?,
                None => current.content,
            },
            author: match input.author {
                Some(author) => optional_text("author", Some(author.as_str()), MAX_TITLE_CHARS)?,
                None => current.author,
            },
            image_url: match input.image_url {
                Some(url) => validate_image_url(Some(url.as_str()))?,
                None => current.image_url,
            },
        };
        self.repo
            .update(id, &fields, self.clock.now())
            .await?
            .ok_or(AppError::NotFound)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound);
        }
        info!(post_id = %id, "Blog post deleted");
        Ok(())
    }
}

fn validate_image_url(raw: Option<&str>) -> AppResult<Option<String>> {
    let Some(value) = optional_text("image_url", raw, 2_000)? else {
        return Ok(None);
    };
    match url::Url::parse(&value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(Some(value)),
        _ => Err(AppError::InvalidInput("image_url must be an http(s) URL".into())),
    }
}
