use std::sync::Arc;

use crate::{
    infra::config::AppConfig,
    use_cases::{admin::AdminUseCases, blog::BlogUseCases, subscriber::SubscriberUseCases},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub subscriber_use_cases: Arc<SubscriberUseCases>,
    pub admin_use_cases: Arc<AdminUseCases>,
    pub blog_use_cases: Arc<BlogUseCases>,
}
