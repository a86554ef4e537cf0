use crate::domain::ports::TokenStoreRef;
use crate::domain::token::{MobileToken, TokenStatus, hash_secret};
use crate::error::Result;
use chrono::{Duration, Utc};
use rand::RngCore;
use tracing::{debug, info};

/// Issues, validates, and revokes mobile bearer tokens.
///
/// The plaintext secret exists exactly once, in the return value of `issue`;
/// only its hash is stored.
pub struct MobileTokenService {
    tokens: TokenStoreRef,
}

impl MobileTokenService {
    pub fn new(tokens: TokenStoreRef) -> Self {
        Self { tokens }
    }

    /// Generates a fresh secret for `payer_id` and returns it.
    ///
    /// `ttl_days` of zero or less means no expiry.
    pub async fn issue(&self, payer_id: u64, ttl_days: Option<i64>) -> Result<String> {
        let mut secret_bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut secret_bytes);
        let secret = hex::encode(secret_bytes);

        let id = self.tokens.next_id().await?;
        let now = Utc::now();
        let token = MobileToken {
            id,
            token_hash: hash_secret(&secret),
            payer_id,
            installation_id: None,
            status: TokenStatus::Active,
            created_at: now,
            expires_at: ttl_days
                .filter(|days| *days > 0)
                .map(|days| now + Duration::days(days)),
            revoked_at: None,
            last_used_at: None,
        };
        self.tokens.store(token).await?;
        info!(token = id, payer = payer_id, "mobile token issued");
        Ok(secret)
    }

    /// Resolves a bearer secret to the owning payer identity.
    ///
    /// Returns `None` for unknown, revoked, or expired tokens, and for a
    /// presented installation id that differs from an existing binding. The
    /// first non-blank installation id presented on a successful validation
    /// binds the token to that installation. Each success advances the
    /// last-used timestamp.
    pub async fn validate(&self, secret: &str, installation_id: Option<&str>) -> Result<Option<u64>> {
        let hash = hash_secret(secret);
        let Some(mut token) = self.tokens.find_by_hash(&hash).await? else {
            return Ok(None);
        };

        let now = Utc::now();
        if !token.is_usable(now) {
            debug!(token = token.id, "mobile token rejected: not usable");
            return Ok(None);
        }

        match (token.installation_id.as_deref(), installation_id) {
            (None, Some(presented)) if !presented.trim().is_empty() => {
                // Trust-on-first-use: the first installation seen wins.
                token.installation_id = Some(presented.to_string());
            }
            (Some(bound), Some(presented)) if bound != presented => {
                debug!(token = token.id, "mobile token rejected: installation mismatch");
                return Ok(None);
            }
            _ => {}
        }

        token.last_used_at = Some(now);
        let payer_id = token.payer_id;
        self.tokens.store(token).await?;
        Ok(Some(payer_id))
    }

    /// Revokes the token if it exists and belongs to `requester`.
    ///
    /// Deliberately silent otherwise so the endpoint leaks nothing about
    /// other payers' token ids.
    pub async fn revoke(&self, id: u64, requester: u64) -> Result<()> {
        if let Some(mut token) = self.tokens.get(id).await?
            && token.payer_id == requester
            && token.status == TokenStatus::Active
        {
            token.status = TokenStatus::Revoked;
            token.revoked_at = Some(Utc::now());
            self.tokens.store(token).await?;
            info!(token = id, "mobile token revoked");
        }
        Ok(())
    }
}
