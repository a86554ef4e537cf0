use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenStatus {
    Active,
    Revoked,
}

/// A long-lived bearer credential for the mobile payment path.
///
/// Only a one-way hash of the secret is ever stored. Once an installation
/// binding is set it never migrates: a validation attempt from a different
/// installation is rejected even with the correct secret.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MobileToken {
    pub id: u64,
    pub token_hash: String,
    pub payer_id: u64,
    pub installation_id: Option<String>,
    pub status: TokenStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub last_used_at: Option<DateTime<Utc>>,
}

impl MobileToken {
    /// Whether the token can still authenticate at `now`.
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.status == TokenStatus::Active
            && self.revoked_at.is_none()
            && self.expires_at.is_none_or(|expires_at| expires_at > now)
    }
}

/// One-way hash under which bearer secrets are stored and looked up.
pub fn hash_secret(secret: &str) -> String {
    blake3::hash(secret.as_bytes()).to_hex().to_string()
}
