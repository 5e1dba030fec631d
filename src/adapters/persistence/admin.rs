use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    domain::entities::admin::Admin,
    use_cases::admin::AdminRepo,
};

fn row_to_admin(row: sqlx::postgres::PgRow) -> Admin {
    Admin {
        id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl AdminRepo for PostgresPersistence {
    async fn get_by_email(&self, email: &str) -> AppResult<Option<Admin>> {
        let row = sqlx::query(
            "SELECT id, email, password_hash, created_at FROM admins WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.map(row_to_admin))
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Admin>> {
        let row = sqlx::query("SELECT id, email, password_hash, created_at FROM admins WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(row.map(row_to_admin))
    }

    async fn create(&self, email: &str, password_hash: &str) -> AppResult<Admin> {
        let row = sqlx::query(
            r#"
                INSERT INTO admins (id, email, password_hash)
                VALUES ($1, $2, $3)
                RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row_to_admin(row))
    }
}
