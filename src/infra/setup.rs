use crate::{
    adapters::{email::resend::ResendEmailSender, http::app_state::AppState},
    application::clock::{Clock, SystemClock},
    infra::{InfraError, config::AppConfig, postgres_persistence},
    use_cases::{
        admin::{AdminRepo, AdminUseCases},
        blog::{BlogRepo, BlogUseCases},
        subscriber::{EmailSender, SubscriberRepo, SubscriberUseCases},
    },
};
use std::fs::File;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub async fn init_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let postgres_arc = Arc::new(postgres_persistence(&config.database_url).await?);

    let email: Arc<dyn EmailSender> = Arc::new(ResendEmailSender::new(
        config.resend_api_key.clone(),
        config.email_from.clone(),
    )?);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let subscriber_use_cases = SubscriberUseCases::new(
        postgres_arc.clone() as Arc<dyn SubscriberRepo>,
        email,
        clock.clone(),
        config.app_origin.to_string(),
        config.reminder_policy,
    );

    let admin_use_cases = AdminUseCases::new(
        postgres_arc.clone() as Arc<dyn AdminRepo>,
        config.jwt_secret.clone(),
        config.access_token_ttl,
    );

    if let (Some(admin_email), Some(admin_password)) = (&config.admin_email, &config.admin_password) {
        admin_use_cases
            .ensure_bootstrap_admin(admin_email, admin_password)
            .await
            .map_err(InfraError::AdminBootstrap)?;
    } else {
        tracing::warn!("ADMIN_EMAIL/ADMIN_PASSWORD not set, skipping admin bootstrap");
    }

    let blog_use_cases = BlogUseCases::new(postgres_arc.clone() as Arc<dyn BlogRepo>, clock);

    Ok(AppState {
        config: Arc::new(config),
        subscriber_use_cases: Arc::new(subscriber_use_cases),
        admin_use_cases: Arc::new(admin_use_cases),
        blog_use_cases: Arc::new(blog_use_cases),
    })
}

pub fn init_tracing(log_file: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "subdesk=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .pretty();

    // File (structured JSON logs)
    let (json_layer, file_error) = match File::create(log_file) {
        Ok(file) => (
            Some(
                fmt::layer()
                    .json()
                    .with_writer(file)
                    .with_current_span(true)
                    .with_span_list(true),
            ),
            None,
        ),
        Err(e) => (None, Some(e)),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();

    if let Some(e) = file_error {
        tracing::warn!(log_file, error = %e, "Cannot create log file, logging to console only");
    }
}
