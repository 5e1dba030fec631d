use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use super::{invoice_status::InvoiceStatus, plan::PlanKind};

#[derive(Debug, Clone)]
pub struct Subscriber {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    /// Plan name exactly as the customer submitted it.
    pub plan: String,
    pub plan_kind: PlanKind,
    pub payment_method: Option<String>,
    pub payment_reference: Option<String>,
    pub invoice_status: InvoiceStatus,
    pub status_changed_at: NaiveDateTime,
    /// Due date the most recent renewal reminder was sent for.
    pub last_reminded_for: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
}
