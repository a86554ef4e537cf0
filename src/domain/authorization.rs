use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable outcome codes for an authorization attempt.
///
/// The string forms are the wire contract between the transaction processor
/// and the bank core and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthorizationCode {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "CARTE_INEXISTANTE")]
    CardNotFound,
    #[serde(rename = "CARTE_BLOQUEE")]
    CardBlocked,
    #[serde(rename = "CARTE_EXPIREE")]
    CardExpired,
    #[serde(rename = "CVV_INVALIDE")]
    InvalidCvv,
    #[serde(rename = "SOLDE_INSUFFISANT")]
    InsufficientFunds,
}

impl AuthorizationCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::CardNotFound => "CARTE_INEXISTANTE",
            Self::CardBlocked => "CARTE_BLOQUEE",
            Self::CardExpired => "CARTE_EXPIREE",
            Self::InvalidCvv => "CVV_INVALIDE",
            Self::InsufficientFunds => "SOLDE_INSUFFISANT",
        }
    }

    /// Operator-facing message matching the code.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Ok => "Paiement autorisé",
            Self::CardNotFound => "Carte non trouvée",
            Self::CardBlocked => "Carte bloquée",
            Self::CardExpired => "Date d'expiration non concordante",
            Self::InvalidCvv => "CVV invalide",
            Self::InsufficientFunds => "Solde insuffisant",
        }
    }
}

impl fmt::Display for AuthorizationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One authorization attempt against the bank core.
///
/// Expiration and CVV are optional: a blank or absent value skips that check,
/// which supports the reduced-friction flow where possession was already
/// proven some other way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationRequest {
    pub card_number: String,
    pub expiration: Option<String>,
    pub cvv: Option<String>,
    pub amount: Decimal,
}

/// The bank core's answer to one authorization attempt.
///
/// Business denials are data, not errors: `success: false` plus a code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationOutcome {
    pub success: bool,
    pub code: AuthorizationCode,
    pub message: String,
}

impl AuthorizationOutcome {
    pub fn approved() -> Self {
        Self {
            success: true,
            code: AuthorizationCode::Ok,
            message: AuthorizationCode::Ok.message().to_string(),
        }
    }

    pub fn denied(code: AuthorizationCode) -> Self {
        Self {
            success: false,
            code,
            message: code.message().to_string(),
        }
    }
}
