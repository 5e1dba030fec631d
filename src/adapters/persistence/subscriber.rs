use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::Row;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    domain::entities::{invoice_status::InvoiceStatus, plan::PlanKind, subscriber::Subscriber},
    use_cases::subscriber::{NewSubscriber, SubscriberRepo},
};

const SUBSCRIBER_COLUMNS: &str = "id, full_name, email, phone, company, plan, payment_method, payment_reference, invoice_status, status_changed_at, last_reminded_for, created_at";

fn row_to_subscriber(row: sqlx::postgres::PgRow) -> Subscriber {
    let plan: String = row.get("plan");
    Subscriber {
        id: row.get("id"),
        full_name: row.get("full_name"),
        email: row.get("email"),
        phone: row.get("phone"),
        company: row.get("company"),
        plan_kind: PlanKind::from_plan_name(&plan),
        plan,
        payment_method: row.get("payment_method"),
        payment_reference: row.get("payment_reference"),
        invoice_status: InvoiceStatus::from_db(row.get("invoice_status")),
        status_changed_at: row.get("status_changed_at"),
        last_reminded_for: row.get("last_reminded_for"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl SubscriberRepo for PostgresPersistence {
    async fn create(&self, input: &NewSubscriber) -> AppResult<Subscriber> {
        let id = Uuid::new_v4();
        let row = sqlx::query(&format!(
            r#"
                INSERT INTO subscribers
                    (id, full_name, email, phone, company, plan, payment_method, payment_reference,
                     invoice_status, status_changed_at, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
                RETURNING {SUBSCRIBER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&input.full_name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.company)
        .bind(&input.plan)
        .bind(&input.payment_method)
        .bind(&input.payment_reference)
        .bind(input.invoice_status.as_str())
        .bind(input.status_changed_at)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row_to_subscriber(row))
    }

    async fn list_all(&self) -> AppResult<Vec<Subscriber>> {
        let rows = sqlx::query(&format!(
            "SELECT {SUBSCRIBER_COLUMNS} FROM subscribers ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(rows.into_iter().map(row_to_subscriber).collect())
    }

    async fn list_by_status(&self, status: InvoiceStatus) -> AppResult<Vec<Subscriber>> {
        let rows = sqlx::query(&format!(
            "SELECT {SUBSCRIBER_COLUMNS} FROM subscribers WHERE invoice_status = $1 ORDER BY created_at DESC"
        ))
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(rows.into_iter().map(row_to_subscriber).collect())
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Subscriber>> {
        let row = sqlx::query(&format!(
            "SELECT {SUBSCRIBER_COLUMNS} FROM subscribers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.map(row_to_subscriber))
    }

    async fn mark_pending(
        &self,
        ids: &[Uuid],
        read_at: NaiveDateTime,
        changed_at: NaiveDateTime,
    ) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        // Rows renewed or demoted since the caller's read are left alone.
        let result = sqlx::query(
            r#"
                UPDATE subscribers
                SET invoice_status = 'pending', status_changed_at = $2
                WHERE id = ANY($1)
                  AND invoice_status IN ('paid', 'Free')
                  AND status_changed_at < $3
            "#,
        )
        .bind(ids)
        .bind(changed_at)
        .bind(read_at)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(result.rows_affected())
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: InvoiceStatus,
        changed_at: NaiveDateTime,
    ) -> AppResult<Option<Subscriber>> {
        let row = sqlx::query(&format!(
            r#"
                UPDATE subscribers
                SET invoice_status = $2, status_changed_at = $3, last_reminded_for = NULL
                WHERE id = $1
                RETURNING {SUBSCRIBER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status.as_str())
        .bind(changed_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.map(row_to_subscriber))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM subscribers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(result.rows_affected() > 0)
    }

    async fn mark_reminded(&self, id: Uuid, due: NaiveDate) -> AppResult<()> {
        let result = sqlx::query("UPDATE subscribers SET last_reminded_for = $2 WHERE id = $1")
            .bind(id)
            .bind(due)
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
