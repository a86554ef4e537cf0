use super::card::Amount;
use crate::error::{PaymentError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Gateway-side view of one logical payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Persisted before the transaction processor is called. A record left in
    /// this state means the outcome is unknown, not that the payment failed.
    Created,
    Success,
    Failed,
}

/// A normalized payment request as forwarded to the transaction processor.
///
/// `payer_id` is always overwritten by the gateway with the identity it
/// resolved itself; a caller-supplied value is never trusted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub amount: Decimal,
    pub card_number: String,
    pub expiration: String,
    pub cvv: String,
    pub card_holder: String,
    pub payer_id: Option<u64>,
}

/// The gateway's durable record of one payment.
///
/// Only the last 4 digits of the card ever reach this record. The status moves
/// `Created -> Success` or `Created -> Failed` exactly once, never backward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: u64,
    pub amount: Amount,
    pub card_last4: Option<String>,
    pub payer_id: Option<u64>,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

impl PaymentRecord {
    pub fn new(id: u64, amount: Amount, card_last4: Option<String>, payer_id: Option<u64>) -> Self {
        Self {
            id,
            amount,
            card_last4,
            payer_id,
            status: PaymentStatus::Created,
            created_at: Utc::now(),
        }
    }

    /// Applies the final status reported by the transaction processor.
    ///
    /// Rejects any transition from a non-`Created` state.
    pub fn finalize(&mut self, success: bool) -> Result<()> {
        if self.status != PaymentStatus::Created {
            return Err(PaymentError::ValidationError(format!(
                "payment {} already finalized",
                self.id
            )));
        }
        self.status = if success {
            PaymentStatus::Success
        } else {
            PaymentStatus::Failed
        };
        Ok(())
    }
}

/// Extracts the last 4 digits for local storage, or `None` for short inputs.
pub fn card_last4(card_number: &str) -> Option<String> {
    card_number
        .char_indices()
        .rev()
        .nth(3)
        .map(|(idx, _)| card_number[idx..].to_string())
}
