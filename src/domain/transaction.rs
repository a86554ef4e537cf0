use super::authorization::AuthorizationCode;
use super::card::Amount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Success,
    Failed,
}

/// Immutable record of what the bank core actually did for one authorization
/// attempt.
///
/// Written exactly once, after the bank call returned; a request that never
/// reached the bank leaves no record. The card number is masked before it is
/// stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: u64,
    pub amount: Amount,
    /// Masked form, `**** **** **** 1234`.
    pub card_number: String,
    pub card_holder: String,
    pub expiration: String,
    pub status: TransactionStatus,
    pub bank_code: AuthorizationCode,
    pub bank_message: String,
    pub created_at: DateTime<Utc>,
}

/// The transaction processor's answer to the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionOutcome {
    pub success: bool,
    pub code: AuthorizationCode,
    pub message: String,
    pub transaction_id: u64,
}

/// Masks a card number down to its last 4 digits.
///
/// The exact format is parsed by external consumers and must stay stable.
pub fn mask_card_number(card_number: &str) -> String {
    match card_number.char_indices().rev().nth(3) {
        Some((idx, _)) => format!("**** **** **** {}", &card_number[idx..]),
        None => "****".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_card_number() {
        assert_eq!(
            mask_card_number("4123456789012345"),
            "**** **** **** 2345"
        );
        assert_eq!(mask_card_number("1234"), "**** **** **** 1234");
        assert_eq!(mask_card_number("123"), "****");
        assert_eq!(mask_card_number(""), "****");
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&TransactionStatus::Failed).unwrap();
        assert_eq!(json, "\"FAILED\"");
    }
}
