use std::net::SocketAddr;

use axum::http::HeaderValue;
use env_helpers::{get_env, get_env_default};
use secrecy::SecretString;
use time::Duration;
use url::Url;

use crate::domain::lifecycle::ReminderPolicy;

pub struct AppConfig {
    pub jwt_secret: SecretString,
    pub access_token_ttl: Duration,
    /// Public site URL, used for links in outgoing email.
    pub app_origin: Url,
    pub cors_origin: HeaderValue,
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub resend_api_key: SecretString,
    pub email_from: String,
    /// Admin account created at startup when it does not exist yet.
    pub admin_email: Option<String>,
    pub admin_password: Option<SecretString>,
    /// UTC hour (0-23) at which reconcile and the reminder sweep run.
    pub daily_job_hour: u32,
    pub reminder_policy: ReminderPolicy,
    pub log_file: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let jwt_secret: SecretString = SecretString::new(get_env::<String>("JWT_SECRET").into());
        let access_token_ttl_secs: i64 = get_env_default("ACCESS_TOKEN_TTL_SECS", 86_400);

        let app_origin: Url = get_env("APP_ORIGIN");
        let cors_origin: HeaderValue =
            get_env_default("CORS_ORIGIN", String::from("http://localhost:3000"))
                .parse()
                .expect("CORS_ORIGIN must be a valid header value");

        let bind_addr: SocketAddr =
            get_env_default("BIND_ADDR", SocketAddr::from(([127, 0, 0, 1], 3001)));
        let database_url: String = get_env("DATABASE_URL");

        let resend_api_key: SecretString =
            SecretString::new(get_env::<String>("RESEND_API_KEY").into());
        let email_from: String = get_env("EMAIL_FROM");

        let admin_email: Option<String> = std::env::var("ADMIN_EMAIL")
            .ok()
            .filter(|s| !s.trim().is_empty());
        let admin_password: Option<SecretString> = std::env::var("ADMIN_PASSWORD")
            .ok()
            .filter(|s| !s.is_empty())
            .map(|s| SecretString::new(s.into()));

        let daily_job_hour: u32 = get_env_default("DAILY_JOB_HOUR", 9);
        let reminder_policy: ReminderPolicy =
            get_env_default("REMINDER_POLICY", ReminderPolicy::Exact);
        let log_file: String = get_env_default("LOG_FILE", "app.log".to_string());

        Self {
            jwt_secret,
            access_token_ttl: Duration::seconds(access_token_ttl_secs),
            app_origin,
            cors_origin,
            bind_addr,
            database_url,
            resend_api_key,
            email_from,
            admin_email,
            admin_password,
            daily_job_hour: daily_job_hour.min(23),
            reminder_policy,
            log_file,
        }
    }

    /// Cookies are marked `Secure` whenever the site itself is served over TLS.
    pub fn secure_cookies(&self) -> bool {
        self.app_origin.scheme() == "https"
    }
}
