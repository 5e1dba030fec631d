use chrono::NaiveDateTime;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Admin {
    pub id: Uuid,
    pub email: String,
    /// Argon2 hash in PHC string format.
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}
