//! Test data factories for creating valid test fixtures.
//!
//! Each factory function creates a complete, valid object with sensible defaults.
//! Use the closure parameter to override specific fields as needed.

use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::domain::entities::{
    blog_post::BlogPost, invoice_status::InvoiceStatus, plan::PlanKind, subscriber::Subscriber,
};

/// Midnight of the given day.
pub fn test_datetime(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid test date")
}

/// Create a test subscriber with sensible defaults.
///
/// Defaults to a `pending` Monthly subscriber; keep `plan` and `plan_kind`
/// consistent when overriding either.
pub fn create_test_subscriber(overrides: impl FnOnce(&mut Subscriber)) -> Subscriber {
    let mut subscriber = Subscriber {
        id: Uuid::new_v4(),
        full_name: "Test Customer".to_string(),
        email: format!("customer-{}@example.com", Uuid::new_v4().simple()),
        phone: Some("+1 555 0100".to_string()),
        company: None,
        plan: "Monthly".to_string(),
        plan_kind: PlanKind::Monthly,
        payment_method: Some("card".to_string()),
        payment_reference: None,
        invoice_status: InvoiceStatus::Pending,
        status_changed_at: test_datetime(2024, 1, 1),
        last_reminded_for: None,
        created_at: test_datetime(2024, 1, 1),
    };
    overrides(&mut subscriber);
    subscriber
}

/// Create a test blog post with sensible defaults.
pub fn create_test_blog_post(overrides: impl FnOnce(&mut BlogPost)) -> BlogPost {
    let mut post = BlogPost {
        id: Uuid::new_v4(),
        title: "Why subscriptions".to_string(),
        summary: Some("A short summary".to_string()),
        content: "Long form content".to_string(),
        author: Some("Team".to_string()),
        image_url: None,
        created_at: test_datetime(2024, 1, 1),
        updated_at: test_datetime(2024, 1, 1),
    };
    overrides(&mut post);
    post
}
