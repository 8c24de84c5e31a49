use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Single-use six digit code for account confirmation and password reset
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Token {
    pub id: Uuid,
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Token {
    pub fn new(token: String, user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            token,
            user_id,
            created_at: Utc::now(),
        }
    }

    /// Oldest issue time still accepted for a given time-to-live.
    /// A ttl too large to represent accepts every stored token.
    pub fn issued_after(ttl_minutes: i64) -> DateTime<Utc> {
        Duration::try_minutes(ttl_minutes)
            .and_then(|ttl| Utc::now().checked_sub_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}
