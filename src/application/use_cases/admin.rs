use std::sync::{Arc, OnceLock};

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use rand::rngs::OsRng;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::{jwt, validators::is_valid_email},
    domain::entities::admin::Admin,
};

const MIN_PASSWORD_LEN: usize = 8;

#[async_trait]
pub trait AdminRepo: Send + Sync {
    async fn get_by_email(&self, email: &str) -> AppResult<Option<Admin>>;
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Admin>>;
    async fn create(&self, email: &str, password_hash: &str) -> AppResult<Admin>;
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminProfile {
    pub id: Uuid,
    pub email: String,
    pub created_at: NaiveDateTime,
}

impl From<Admin> for AdminProfile {
    fn from(admin: Admin) -> Self {
        Self {
            id: admin.id,
            email: admin.email,
            created_at: admin.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoginResult {
    pub admin: AdminProfile,
    pub token: String,
}

#[derive(Clone)]
pub struct AdminUseCases {
    repo: Arc<dyn AdminRepo>,
    jwt_secret: SecretString,
    token_ttl: Duration,
}

impl AdminUseCases {
    pub fn new(repo: Arc<dyn AdminRepo>, jwt_secret: SecretString, token_ttl: Duration) -> Self {
        Self {
            repo,
            jwt_secret,
            token_ttl,
        }
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &SecretString) -> AppResult<LoginResult> {
        let email = email.trim().to_lowercase();
        let admin = self.repo.get_by_email(&email).await?;

        // Unknown emails still pay for one argon2 verification.
        let stored = admin.as_ref().map(|a| a.password_hash.clone());
        let password = password.clone();
        let matches = blocking(move || {
            let hash: &str = match stored.as_deref() {
                Some(h) => h,
                None => dummy_password_hash(),
            };
            verify_password(password.expose_secret(), hash)
        })
        .await?;

        let admin = match admin {
            Some(admin) if matches => admin,
            _ => return Err(AppError::InvalidCredentials),
        };

        let token = jwt::issue(admin.id, &self.jwt_secret, self.token_ttl)?;
        info!(admin_id = %admin.id, "Admin logged in");
        Ok(LoginResult {
            admin: admin.into(),
            token,
        })
    }

    /// Resolve the admin behind an access token.
    pub async fn authenticate(&self, token: &str) -> AppResult<AdminProfile> {
        let claims = jwt::verify(token, &self.jwt_secret)?;
        let admin_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidCredentials)?;
        // A deleted admin's token stops working immediately.
        self.repo
            .get_by_id(admin_id)
            .await?
            .map(AdminProfile::from)
            .ok_or(AppError::InvalidCredentials)
    }

    /// Create the configured admin account if it does not exist yet.
    /// An existing account keeps its password.
    #[instrument(skip(self, password))]
    pub async fn ensure_bootstrap_admin(&self, email: &str, password: &SecretString) -> AppResult<()> {
        let email = email.trim().to_lowercase();
        if !is_valid_email(&email) {
            return Err(AppError::InvalidInput("ADMIN_EMAIL is not a valid email".into()));
        }
        if self.repo.get_by_email(&email).await?.is_some() {
            return Ok(());
        }
        if password.expose_secret().chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::InvalidInput(format!(
                "Admin password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        let password = password.clone();
        let hash = blocking(move || hash_password(password.expose_secret())).await??;
        let admin = self.repo.create(&email, &hash).await?;
        info!(admin_id = %admin.id, "Bootstrap admin created");
        Ok(())
    }
}

/// Run CPU-heavy password work off the async workers.
async fn blocking<T, F>(work: F) -> AppResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(format!("password task failed: {e}")))
}

/// Stand-in hash for logins that name no known admin.
fn dummy_password_hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password("subdesk-no-such-admin").unwrap_or_default())
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(e.to_string()))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}
