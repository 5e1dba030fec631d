//! Test app state builder for HTTP-level integration testing.
//!
//! `TestAppStateBuilder` wires an `AppState` over in-memory repositories, a fixed
//! clock and a recording email sender, with one admin account already present.

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};

use axum::http::HeaderValue;
use secrecy::SecretString;
use time::Duration;
use url::Url;
use uuid::Uuid;

use crate::{
    adapters::http::app_state::AppState,
    application::{
        jwt,
        use_cases::{
            admin::{AdminUseCases, hash_password},
            blog::BlogUseCases,
            subscriber::SubscriberUseCases,
        },
    },
    domain::{
        entities::{admin::Admin, blog_post::BlogPost, subscriber::Subscriber},
        lifecycle::ReminderPolicy,
    },
    infra::config::AppConfig,
    test_utils::{
        FixedClock, InMemoryAdminRepo, InMemoryBlogRepo, InMemoryEmailSender,
        InMemorySubscriberRepo, test_datetime,
    },
};

pub const TEST_ADMIN_EMAIL: &str = "admin@example.com";
pub const TEST_ADMIN_PASSWORD: &str = "correct-horse-battery";
const TEST_JWT_SECRET: &str = "test_jwt_secret";

/// Argon2 is slow in debug builds; hash the shared password once per test binary.
fn test_admin_hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(TEST_ADMIN_PASSWORD).expect("hash test password"))
}

/// Everything a route test needs to act and then inspect side effects.
pub struct TestApp {
    pub app_state: AppState,
    pub subscriber_repo: Arc<InMemorySubscriberRepo>,
    pub blog_repo: Arc<InMemoryBlogRepo>,
    pub email_sender: Arc<InMemoryEmailSender>,
    /// Valid access token for the seeded admin.
    pub admin_token: String,
}

impl TestApp {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.admin_token)
    }
}

pub struct TestAppStateBuilder {
    subscribers: Vec<Subscriber>,
    posts: Vec<BlogPost>,
    clock: FixedClock,
    email_sender: Arc<InMemoryEmailSender>,
    reminder_policy: ReminderPolicy,
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            posts: Vec::new(),
            clock: FixedClock(test_datetime(2024, 5, 8)),
            email_sender: Arc::new(InMemoryEmailSender::new()),
            reminder_policy: ReminderPolicy::Exact,
        }
    }

    pub fn with_subscriber(mut self, subscriber: Subscriber) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    pub fn with_post(mut self, post: BlogPost) -> Self {
        self.posts.push(post);
        self
    }

    pub fn with_clock(mut self, clock: FixedClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_email_sender(mut self, sender: InMemoryEmailSender) -> Self {
        self.email_sender = Arc::new(sender);
        self
    }

    pub fn with_reminder_policy(mut self, policy: ReminderPolicy) -> Self {
        self.reminder_policy = policy;
        self
    }

    pub fn build(self) -> TestApp {
        let jwt_secret = SecretString::new(TEST_JWT_SECRET.into());
        let access_token_ttl = Duration::hours(24);
        let clock = Arc::new(self.clock);

        let subscriber_repo = Arc::new(InMemorySubscriberRepo::with_subscribers(self.subscribers));
        let blog_repo = Arc::new(InMemoryBlogRepo::with_posts(self.posts));

        let admin = Admin {
            id: Uuid::new_v4(),
            email: TEST_ADMIN_EMAIL.to_string(),
            password_hash: test_admin_hash().to_string(),
            created_at: test_datetime(2024, 1, 1),
        };
        let admin_token =
            jwt::issue(admin.id, &jwt_secret, access_token_ttl).expect("issue test token");
        let admin_repo = Arc::new(InMemoryAdminRepo::with_admins(vec![admin]));

        let config = Arc::new(AppConfig {
            jwt_secret: jwt_secret.clone(),
            access_token_ttl,
            app_origin: Url::parse("http://localhost:3000").unwrap(),
            cors_origin: HeaderValue::from_static("http://localhost:3000"),
            bind_addr: "127.0.0.1:3001".parse::<SocketAddr>().unwrap(),
            database_url: String::new(),
            resend_api_key: SecretString::new("test_resend_key".into()),
            email_from: "billing@example.com".to_string(),
            admin_email: None,
            admin_password: None,
            daily_job_hour: 9,
            reminder_policy: self.reminder_policy,
            log_file: String::new(),
        });

        let subscriber_use_cases = Arc::new(SubscriberUseCases::new(
            subscriber_repo.clone(),
            self.email_sender.clone(),
            clock.clone(),
            config.app_origin.to_string(),
            self.reminder_policy,
        ));
        let admin_use_cases = Arc::new(AdminUseCases::new(
            admin_repo,
            jwt_secret,
            access_token_ttl,
        ));
        let blog_use_cases = Arc::new(BlogUseCases::new(blog_repo.clone(), clock));

        TestApp {
            app_state: AppState {
                config,
                subscriber_use_cases,
                admin_use_cases,
                blog_use_cases,
            },
            subscriber_repo,
            blog_repo,
            email_sender: self.email_sender,
            admin_token,
        }
    }
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
