use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    domain::entities::blog_post::BlogPost,
    use_cases::blog::{BlogPostFields, BlogRepo},
};

fn row_to_post(row: sqlx::postgres::PgRow) -> BlogPost {
    BlogPost {
        id: row.get("id"),
        title: row.get("title"),
        summary: row.get("summary"),
        content: row.get("content"),
        author: row.get("author"),
        image_url: row.get("image_url"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl BlogRepo for PostgresPersistence {
    async fn create(&self, post: &BlogPostFields, now: NaiveDateTime) -> AppResult<BlogPost> {
        let row = sqlx::query(
            r#"
                INSERT INTO blog_posts (id, title, summary, content, author, image_url, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
                RETURNING id, title, summary, content, author, image_url, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&post.title)
        .bind(&post.summary)
        .bind(&post.content)
        .bind(&post.author)
        .bind(&post.image_url)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row_to_post(row))
    }

    async fn list(&self) -> AppResult<Vec<BlogPost>> {
        let rows = sqlx::query(
            "SELECT id, title, summary, content, author, image_url, created_at, updated_at FROM blog_posts ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(rows.into_iter().map(row_to_post).collect())
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<BlogPost>> {
        let row = sqlx::query(
            "SELECT id, title, summary, content, author, image_url, created_at, updated_at FROM blog_posts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.map(row_to_post))
    }

    async fn update(
        &self,
        id: Uuid,
        post: &BlogPostFields,
        now: NaiveDateTime,
    ) -> AppResult<Option<BlogPost>> {
        let row = sqlx::query(
            r#"
                UPDATE blog_posts
                SET title = $2, summary = $3, content = $4, author = $5, image_url = $6, updated_at = $7
                WHERE id = $1
                RETURNING id, title, summary, content, author, image_url, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&post.title)
        .bind(&post.summary)
        .bind(&post.content)
        .bind(&post.author)
        .bind(&post.image_url)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.map(row_to_post))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(result.rows_affected() > 0)
    }
}
