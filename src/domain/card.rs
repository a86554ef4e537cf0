use crate::error::PaymentError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Represents a monetary value held on a card account.
///
/// This is a wrapper around `rust_decimal::Decimal` to enforce domain-specific rules
/// and provide type safety for financial calculations.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Balance(pub Decimal);

/// Represents a positive monetary amount for an authorization or top-up.
///
/// Ensures that amounts are always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, PaymentError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(PaymentError::ValidationError(
                "Amount must be positive".to_string(),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = PaymentError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl From<Amount> for Balance {
    fn from(amount: Amount) -> Self {
        Self(amount.0)
    }
}

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Balance {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Balance {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl AddAssign for Balance {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Balance {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

/// The authoritative card record held by the bank core.
///
/// The card number is the primary key and is never regenerated. The balance is
/// only ever mutated by a successful authorization or an administrative top-up
/// and must never go below zero.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct CardAccount {
    /// Full card number; never leaves the bank core unmasked.
    pub card_number: String,
    /// Expiration as `YYYY-MM`.
    pub expiration: String,
    /// Card verification code.
    pub cvv: String,
    /// Current balance, non-negative.
    pub balance: Balance,
    /// Inactive cards are blocked from all authorizations.
    pub active: bool,
}

impl CardAccount {
    pub fn new(card_number: impl Into<String>, expiration: impl Into<String>, cvv: impl Into<String>) -> Self {
        Self {
            card_number: card_number.into(),
            expiration: expiration.into(),
            cvv: cvv.into(),
            balance: Balance::ZERO,
            active: true,
        }
    }

    /// Whether the balance covers `amount`.
    pub fn covers(&self, amount: Amount) -> bool {
        self.balance >= amount.into()
    }

    /// Debits the balance if sufficient.
    pub fn debit(&mut self, amount: Amount) -> Result<(), PaymentError> {
        if self.covers(amount) {
            self.balance -= amount.into();
            Ok(())
        } else {
            Err(PaymentError::ValidationError(
                "Insufficient funds".to_string(),
            ))
        }
    }

    /// Credits the balance (administrative top-up).
    pub fn credit(&mut self, amount: Amount) {
        self.balance += amount.into();
    }
}

/// Partial administrative update of a card record.
///
/// Absent fields are left untouched.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct CardUpdate {
    pub expiration: Option<String>,
    pub cvv: Option<String>,
    pub balance: Option<Decimal>,
    pub active: Option<bool>,
}
