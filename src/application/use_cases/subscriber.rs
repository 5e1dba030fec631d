use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::{
        clock::Clock,
        email_templates::{payment_confirmed_email, renewal_reminder_email, signup_received_email},
        validators::{is_valid_email, optional_text, required_text},
    },
    domain::{
        entities::{invoice_status::InvoiceStatus, plan::PlanKind, subscriber::Subscriber},
        lifecycle::{self, ReminderPolicy},
    },
};

#[async_trait]
pub trait SubscriberRepo: Send + Sync {
    async fn create(&self, input: &NewSubscriber) -> AppResult<Subscriber>;
    /// Newest first.
    async fn list_all(&self) -> AppResult<Vec<Subscriber>>;
    async fn list_by_status(&self, status: InvoiceStatus) -> AppResult<Vec<Subscriber>>;
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Subscriber>>;
    /// Bulk demotion of lapsed subscribers. Only rows still `paid`/`Free` whose
    /// status last changed before `read_at` are touched, so a renewal that lands
    /// after the caller's read survives. Returns the number of rows changed.
    async fn mark_pending(
        &self,
        ids: &[Uuid],
        read_at: NaiveDateTime,
        changed_at: NaiveDateTime,
    ) -> AppResult<u64>;
    /// Sets the status, stamps `status_changed_at` and clears the reminder marker.
    async fn set_status(
        &self,
        id: Uuid,
        status: InvoiceStatus,
        changed_at: NaiveDateTime,
    ) -> AppResult<Option<Subscriber>>;
    /// Returns false when no row matched.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
    async fn mark_reminded(&self, id: Uuid, due: NaiveDate) -> AppResult<()>;
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<()>;
}

#[derive(Debug, Clone, Default)]
pub struct SignupInput {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub plan: String,
    pub payment_method: Option<String>,
    pub payment_reference: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewSubscriber {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub plan: String,
    pub payment_method: Option<String>,
    pub payment_reference: Option<String>,
    pub invoice_status: InvoiceStatus,
    pub status_changed_at: NaiveDateTime,
}

/// Subscriber as returned to the admin, with the lifecycle fields resolved for one day.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriberView {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub plan: String,
    pub plan_kind: PlanKind,
    pub payment_method: Option<String>,
    pub payment_reference: Option<String>,
    pub invoice_status: InvoiceStatus,
    pub status_changed_at: NaiveDateTime,
    pub due_date: Option<NaiveDate>,
    pub days_until_due: Option<i64>,
    pub created_at: NaiveDateTime,
}

impl SubscriberView {
    pub fn new(subscriber: Subscriber, today: NaiveDate) -> Self {
        let due_date = lifecycle::due_date(
            subscriber.invoice_status,
            &subscriber.plan_kind,
            subscriber.status_changed_at,
        );
        Self {
            id: subscriber.id,
            full_name: subscriber.full_name,
            email: subscriber.email,
            phone: subscriber.phone,
            company: subscriber.company,
            plan: subscriber.plan,
            plan_kind: subscriber.plan_kind,
            payment_method: subscriber.payment_method,
            payment_reference: subscriber.payment_reference,
            invoice_status: subscriber.invoice_status,
            status_changed_at: subscriber.status_changed_at,
            due_date,
            days_until_due: due_date.map(|due| (due - today).num_days()),
            created_at: subscriber.created_at,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReminderReport {
    pub evaluated: usize,
    pub sent: usize,
    pub failed: usize,
    pub skipped_already_reminded: usize,
}

/// Upper bound on one email send, whatever the transport does.
pub const EMAIL_SEND_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Clone)]
pub struct SubscriberUseCases {
    repo: Arc<dyn SubscriberRepo>,
    email: Arc<dyn EmailSender>,
    clock: Arc<dyn Clock>,
    app_origin: String,
    reminder_policy: ReminderPolicy,
    email_timeout: Duration,
}

impl SubscriberUseCases {
    pub fn new(
        repo: Arc<dyn SubscriberRepo>,
        email: Arc<dyn EmailSender>,
        clock: Arc<dyn Clock>,
        app_origin: String,
        reminder_policy: ReminderPolicy,
    ) -> Self {
        Self {
            repo,
            email,
            clock,
            app_origin,
            reminder_policy,
            email_timeout: EMAIL_SEND_TIMEOUT,
        }
    }

    pub fn with_email_timeout(mut self, email_timeout: Duration) -> Self {
        self.email_timeout = email_timeout;
        self
    }

    #[instrument(skip(self, input), fields(plan = %input.plan))]
    pub async fn signup(&self, input: SignupInput) -> AppResult<SubscriberView> {
        let full_name = required_text("full_name", &input.full_name, 200)?;
        let email = input.email.trim().to_lowercase();
        if !is_valid_email(&email) {
            return Err(AppError::InvalidInput("Invalid email address".into()));
        }
        let plan = required_text("plan", &input.plan, 100)?;
        let kind = PlanKind::from_plan_name(&plan);
        if let PlanKind::Unknown(name) = &kind {
            warn!(plan = %name, "Signup with a plan that has no billing period");
        }

        let new = NewSubscriber {
            full_name,
            email,
            phone: optional_text("phone", input.phone.as_deref(), 50)?,
            company: optional_text("company", input.company.as_deref(), 200)?,
            payment_method: optional_text("payment_method", input.payment_method.as_deref(), 100)?,
            payment_reference: optional_text(
                "payment_reference",
                input.payment_reference.as_deref(),
                200,
            )?,
            invoice_status: lifecycle::initial_status(&kind),
            status_changed_at: self.clock.now(),
            plan,
        };

        let subscriber = self.repo.create(&new).await?;
        info!(subscriber_id = %subscriber.id, status = %subscriber.invoice_status, "Subscriber signed up");

        let (subject, html) = signup_received_email(
            &self.app_origin,
            &subscriber.full_name,
            &subscriber.plan,
            subscriber.plan_kind.is_free_trial(),
        );
        self.dispatch(&subscriber, &subject, &html).await;

        Ok(SubscriberView::new(subscriber, self.clock.today()))
    }

    /// Lists every subscriber after demoting the ones whose period has run out,
    /// so the result never shows a stale `paid`/`Free` marker.
    #[instrument(skip(self))]
    pub async fn list(&self) -> AppResult<Vec<SubscriberView>> {
        let read_at = self.clock.now();
        let today = read_at.date();
        let subscribers = self.repo.list_all().await?;
        let subscribers = if self.demote_lapsed(&subscribers, read_at).await? > 0 {
            self.repo.list_all().await?
        } else {
            subscribers
        };
        Ok(subscribers
            .into_iter()
            .map(|s| SubscriberView::new(s, today))
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> AppResult<SubscriberView> {
        let subscriber = self.repo.get_by_id(id).await?.ok_or(AppError::NotFound)?;
        Ok(SubscriberView::new(subscriber, self.clock.today()))
    }

    #[instrument(skip(self))]
    pub async fn update_status(&self, id: Uuid, status: InvoiceStatus) -> AppResult<SubscriberView> {
        let now = self.clock.now();
        let subscriber = self
            .repo
            .set_status(id, status, now)
            .await?
            .ok_or(AppError::NotFound)?;
        info!(subscriber_id = %id, status = %status, "Invoice status updated");

        if status == InvoiceStatus::Paid {
            match lifecycle::renewal_window(&subscriber.plan_kind, now) {
                Some((_, due)) => {
                    let (subject, html) = payment_confirmed_email(
                        &self.app_origin,
                        &subscriber.full_name,
                        &subscriber.plan,
                        due,
                    );
                    self.dispatch(&subscriber, &subject, &html).await;
                }
                None => warn!(
                    subscriber_id = %id,
                    plan = %subscriber.plan,
                    "Marked paid but the plan has no billing period"
                ),
            }
        }

        Ok(SubscriberView::new(subscriber, now.date()))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound);
        }
        info!(subscriber_id = %id, "Subscriber deleted");
        Ok(())
    }

    /// Demotes every lapsed subscriber. Safe to run repeatedly.
    #[instrument(skip(self))]
    pub async fn reconcile(&self) -> AppResult<u64> {
        let read_at = self.clock.now();
        let subscribers = self.repo.list_all().await?;
        self.demote_lapsed(&subscribers, read_at).await
    }

    /// Sends renewal reminders to `paid` subscribers whose reminder is due today.
    ///
    /// Sends run one at a time; a failed send is logged and the sweep moves on.
    /// A subscriber is reminded at most once per due date.
    #[instrument(skip(self))]
    pub async fn send_due_reminders(&self) -> AppResult<ReminderReport> {
        let today = self.clock.today();
        let paid = self.repo.list_by_status(InvoiceStatus::Paid).await?;
        let mut report = ReminderReport::default();

        for subscriber in paid {
            report.evaluated += 1;
            if !self.reminder_policy.reminder_due(
                &subscriber.plan_kind,
                subscriber.status_changed_at,
                today,
            ) {
                continue;
            }
            let Some(due) = lifecycle::due_date(
                InvoiceStatus::Paid,
                &subscriber.plan_kind,
                subscriber.status_changed_at,
            ) else {
                continue;
            };
            if subscriber.last_reminded_for == Some(due) {
                report.skipped_already_reminded += 1;
                continue;
            }

            let (subject, html) = renewal_reminder_email(
                &self.app_origin,
                &subscriber.full_name,
                &subscriber.plan,
                due,
            );
            match self.send_email(&subscriber.email, &subject, &html).await {
                Ok(()) => {
                    report.sent += 1;
                    if let Err(e) = self.repo.mark_reminded(subscriber.id, due).await {
                        warn!(subscriber_id = %subscriber.id, error = ?e, "Failed to record reminder");
                    }
                }
                Err(e) => {
                    report.failed += 1;
                    error!(subscriber_id = %subscriber.id, error = ?e, "Failed to send renewal reminder");
                }
            }
        }

        info!(
            evaluated = report.evaluated,
            sent = report.sent,
            failed = report.failed,
            skipped = report.skipped_already_reminded,
            "Reminder sweep finished"
        );
        Ok(report)
    }

    async fn demote_lapsed(
        &self,
        subscribers: &[Subscriber],
        read_at: NaiveDateTime,
    ) -> AppResult<u64> {
        let lapsed = lapsed_ids(subscribers, read_at.date());
        if lapsed.is_empty() {
            return Ok(0);
        }
        let demoted = self
            .repo
            .mark_pending(&lapsed, read_at, self.clock.now())
            .await?;
        info!(demoted, "Demoted lapsed subscribers to pending");
        Ok(demoted)
    }

    async fn send_email(&self, to: &str, subject: &str, html: &str) -> AppResult<()> {
        tokio::time::timeout(self.email_timeout, self.email.send(to, subject, html))
            .await
            .unwrap_or_else(|_| {
                Err(AppError::Internal(format!(
                    "email send timed out after {}s",
                    self.email_timeout.as_secs_f32()
                )))
            })
    }

    async fn dispatch(&self, subscriber: &Subscriber, subject: &str, html: &str) {
        if let Err(e) = self.send_email(&subscriber.email, subject, html).await {
            error!(subscriber_id = %subscriber.id, error = ?e, subject, "Failed to send email");
        }
    }
}

fn lapsed_ids(subscribers: &[Subscriber], today: NaiveDate) -> Vec<Uuid> {
    subscribers
        .iter()
        .filter(|s| {
            lifecycle::has_lapsed(s.invoice_status, &s.plan_kind, s.status_changed_at, today)
        })
        .map(|s| s.id)
        .collect()
}
