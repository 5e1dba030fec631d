//! In-memory implementations of the repository and collaborator traits.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::{
        clock::Clock,
        use_cases::{
            admin::AdminRepo,
            blog::{BlogPostFields, BlogRepo},
            subscriber::{EmailSender, NewSubscriber, SubscriberRepo},
        },
    },
    domain::entities::{
        admin::Admin, blog_post::BlogPost, invoice_status::InvoiceStatus, plan::PlanKind,
        subscriber::Subscriber,
    },
};

// ============================================================================
// Clock
// ============================================================================

#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    pub fn at(year: i32, month: u32, day: u32, hour: u32) -> Self {
        let now = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(hour, 0, 0))
            .expect("valid test clock");
        Self(now)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

// ============================================================================
// Email
// ============================================================================

#[derive(Clone, Debug)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Records every email; optionally fails for chosen recipients.
#[derive(Default)]
pub struct InMemoryEmailSender {
    sent: Mutex<Vec<SentEmail>>,
    failing: Vec<String>,
}

impl InMemoryEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(recipients: &[&str]) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: recipients.iter().map(|r| r.to_string()).collect(),
        }
    }

    pub fn all(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, to: &str) -> Vec<SentEmail> {
        self.all().into_iter().filter(|m| m.to == to).collect()
    }
}

#[async_trait]
impl EmailSender for InMemoryEmailSender {
    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<()> {
        if self.failing.iter().any(|f| f == to) {
            return Err(AppError::Internal(format!("mailbox unavailable: {to}")));
        }
        self.sent.lock().unwrap().push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            html: html.to_string(),
        });
        Ok(())
    }
}

/// Fails every send.
pub struct FailingEmailSender;

#[async_trait]
impl EmailSender for FailingEmailSender {
    async fn send(&self, _to: &str, _subject: &str, _html: &str) -> AppResult<()> {
        Err(AppError::Internal("email transport down".into()))
    }
}

/// Accepts a send and never finishes it, like a provider connection that hangs.
pub struct StalledEmailSender;

#[async_trait]
impl EmailSender for StalledEmailSender {
    async fn send(&self, _to: &str, _subject: &str, _html: &str) -> AppResult<()> {
        std::future::pending().await
    }
}

// ============================================================================
// Subscribers
// ============================================================================

#[derive(Default)]
pub struct InMemorySubscriberRepo {
    subscribers: Mutex<HashMap<Uuid, Subscriber>>,
    bulk_updates: AtomicUsize,
}

impl InMemorySubscriberRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subscribers(subscribers: Vec<Subscriber>) -> Self {
        Self {
            subscribers: Mutex::new(subscribers.into_iter().map(|s| (s.id, s)).collect()),
            bulk_updates: AtomicUsize::new(0),
        }
    }

    pub fn get(&self, id: Uuid) -> Option<Subscriber> {
        self.subscribers.lock().unwrap().get(&id).cloned()
    }

    pub fn get_all(&self) -> Vec<Subscriber> {
        self.subscribers.lock().unwrap().values().cloned().collect()
    }

    /// Number of `mark_pending` calls that were made.
    pub fn bulk_updates(&self) -> usize {
        self.bulk_updates.load(Ordering::SeqCst)
    }

    fn sorted(mut list: Vec<Subscriber>) -> Vec<Subscriber> {
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        list
    }
}

#[async_trait]
impl SubscriberRepo for InMemorySubscriberRepo {
    async fn create(&self, input: &NewSubscriber) -> AppResult<Subscriber> {
        let subscriber = Subscriber {
            id: Uuid::new_v4(),
            full_name: input.full_name.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            company: input.company.clone(),
            plan: input.plan.clone(),
            plan_kind: PlanKind::from_plan_name(&input.plan),
            payment_method: input.payment_method.clone(),
            payment_reference: input.payment_reference.clone(),
            invoice_status: input.invoice_status,
            status_changed_at: input.status_changed_at,
            last_reminded_for: None,
            created_at: input.status_changed_at,
        };
        self.subscribers
            .lock()
            .unwrap()
            .insert(subscriber.id, subscriber.clone());
        Ok(subscriber)
    }

    async fn list_all(&self) -> AppResult<Vec<Subscriber>> {
        Ok(Self::sorted(self.get_all()))
    }

    async fn list_by_status(&self, status: InvoiceStatus) -> AppResult<Vec<Subscriber>> {
        Ok(Self::sorted(
            self.get_all()
                .into_iter()
                .filter(|s| s.invoice_status == status)
                .collect(),
        ))
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Subscriber>> {
        Ok(self.get(id))
    }

    async fn mark_pending(
        &self,
        ids: &[Uuid],
        read_at: NaiveDateTime,
        changed_at: NaiveDateTime,
    ) -> AppResult<u64> {
        self.bulk_updates.fetch_add(1, Ordering::SeqCst);
        let mut subscribers = self.subscribers.lock().unwrap();
        let mut changed = 0;
        for id in ids {
            if let Some(s) = subscribers.get_mut(id).filter(|s| {
                s.invoice_status.can_lapse() && s.status_changed_at < read_at
            }) {
                s.invoice_status = InvoiceStatus::Pending;
                s.status_changed_at = changed_at;
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: InvoiceStatus,
        changed_at: NaiveDateTime,
    ) -> AppResult<Option<Subscriber>> {
        let mut subscribers = self.subscribers.lock().unwrap();
        Ok(subscribers.get_mut(&id).map(|s| {
            s.invoice_status = status;
            s.status_changed_at = changed_at;
            s.last_reminded_for = None;
            s.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.subscribers.lock().unwrap().remove(&id).is_some())
    }

    async fn mark_reminded(&self, id: Uuid, due: NaiveDate) -> AppResult<()> {
        let mut subscribers = self.subscribers.lock().unwrap();
        let subscriber = subscribers.get_mut(&id).ok_or(AppError::NotFound)?;
        subscriber.last_reminded_for = Some(due);
        Ok(())
    }
}

// ============================================================================
// Admins
// ============================================================================

#[derive(Default)]
pub struct InMemoryAdminRepo {
    admins: Mutex<HashMap<Uuid, Admin>>,
}

impl InMemoryAdminRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_admins(admins: Vec<Admin>) -> Self {
        Self {
            admins: Mutex::new(admins.into_iter().map(|a| (a.id, a)).collect()),
        }
    }

    pub fn count(&self) -> usize {
        self.admins.lock().unwrap().len()
    }
}

#[async_trait]
impl AdminRepo for InMemoryAdminRepo {
    async fn get_by_email(&self, email: &str) -> AppResult<Option<Admin>> {
        Ok(self
            .admins
            .lock()
            .unwrap()
            .values()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Admin>> {
        Ok(self.admins.lock().unwrap().get(&id).cloned())
    }

    async fn create(&self, email: &str, password_hash: &str) -> AppResult<Admin> {
        let mut admins = self.admins.lock().unwrap();
        if admins.values().any(|a| a.email == email) {
            return Err(AppError::InvalidInput(
                "A record with this value already exists".into(),
            ));
        }
        let admin = Admin {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: chrono::Utc::now().naive_utc(),
        };
        admins.insert(admin.id, admin.clone());
        Ok(admin)
    }
}

// ============================================================================
// Blog
// ============================================================================

#[derive(Default)]
pub struct InMemoryBlogRepo {
    posts: Mutex<HashMap<Uuid, BlogPost>>,
}

impl InMemoryBlogRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_posts(posts: Vec<BlogPost>) -> Self {
        Self {
            posts: Mutex::new(posts.into_iter().map(|p| (p.id, p)).collect()),
        }
    }

    pub fn count(&self) -> usize {
        self.posts.lock().unwrap().len()
    }
}

#[async_trait]
impl BlogRepo for InMemoryBlogRepo {
    async fn create(&self, post: &BlogPostFields, now: NaiveDateTime) -> AppResult<BlogPost> {
        let created = BlogPost {
            id: Uuid::new_v4(),
            title: post.title.clone(),
            summary: post.summary.clone(),
            content: post.content.clone(),
            author: post.author.clone(),
            image_url: post.image_url.clone(),
            created_at: now,
            updated_at: now,
        };
        self.posts.lock().unwrap().insert(created.id, created.clone());
        Ok(created)
    }

    async fn list(&self) -> AppResult<Vec<BlogPost>> {
        let mut posts: Vec<BlogPost> = self.posts.lock().unwrap().values().cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<BlogPost>> {
        Ok(self.posts.lock().unwrap().get(&id).cloned())
    }

    async fn update(
        &self,
        id: Uuid,
        post: &BlogPostFields,
        now: NaiveDateTime,
    ) -> AppResult<Option<BlogPost>> {
        let mut posts = self.posts.lock().unwrap();
        Ok(posts.get_mut(&id).map(|existing| {
            existing.title = post.title.clone();
            existing.summary = post.summary.clone();
            existing.content = post.content.clone();
            existing.author = post.author.clone();
            existing.image_url = post.image_url.clone();
            existing.updated_at = now;
            existing.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.posts.lock().unwrap().remove(&id).is_some())
    }
}
