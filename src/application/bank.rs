use crate::domain::authorization::{AuthorizationCode, AuthorizationOutcome, AuthorizationRequest};
use crate::domain::card::{Amount, Balance, CardAccount, CardUpdate};
use crate::domain::ports::{CardAuthorizer, CardStoreRef};
use crate::domain::transaction::mask_card_number;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Per-card mutual exclusion for balance mutations.
///
/// Two concurrent authorizations against the same card must not both pass the
/// sufficiency check against a stale balance, so the whole check-then-debit
/// sequence runs under the card's lock. Distinct cards never contend.
#[derive(Default)]
struct CardLockRegistry {
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl CardLockRegistry {
    fn lock_for(&self, card_number: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        locks.entry(card_number.to_string()).or_default().clone()
    }
}

/// The bank core: the authoritative owner of card records and balances.
///
/// `authorize` is the only operation that debits a balance; administrative
/// operations may credit or rewrite one. All balance mutations for a card are
/// serialized through [`CardLockRegistry`].
pub struct BankCore {
    cards: CardStoreRef,
    locks: CardLockRegistry,
}

impl BankCore {
    pub fn new(cards: CardStoreRef) -> Self {
        Self {
            cards,
            locks: CardLockRegistry::default(),
        }
    }

    /// Runs one authorization attempt.
    ///
    /// Checks resolve in a fixed order, first match wins: unknown card,
    /// blocked card, expiration mismatch, CVV mismatch, insufficient funds.
    /// A blank or absent expiration/CVV skips that check. Only the final
    /// path debits the balance, exactly once.
    pub async fn authorize(&self, request: AuthorizationRequest) -> Result<AuthorizationOutcome> {
        let amount = Amount::new(request.amount)?;
        let masked = mask_card_number(&request.card_number);

        let lock = self.locks.lock_for(&request.card_number);
        let _guard = lock.lock().await;

        let Some(mut card) = self.cards.get(&request.card_number).await? else {
            info!(card = %masked, "authorization denied: unknown card");
            return Ok(AuthorizationOutcome::denied(AuthorizationCode::CardNotFound));
        };

        if !card.active {
            info!(card = %masked, "authorization denied: card blocked");
            return Ok(AuthorizationOutcome::denied(AuthorizationCode::CardBlocked));
        }

        // A blank value means the caller skipped the check.
        if let Some(expiration) = request.expiration.as_deref()
            && !expiration.trim().is_empty()
            && expiration != card.expiration
        {
            info!(card = %masked, "authorization denied: expiration mismatch");
            return Ok(AuthorizationOutcome::denied(AuthorizationCode::CardExpired));
        }

        if let Some(cvv) = request.cvv.as_deref()
            && !cvv.trim().is_empty()
            && cvv != card.cvv
        {
            info!(card = %masked, "authorization denied: CVV mismatch");
            return Ok(AuthorizationOutcome::denied(AuthorizationCode::InvalidCvv));
        }

        if !card.covers(amount) {
            info!(card = %masked, "authorization denied: insufficient funds");
            return Ok(AuthorizationOutcome::denied(
                AuthorizationCode::InsufficientFunds,
            ));
        }

        card.debit(amount)?;
        self.cards.store(card).await?;
        info!(card = %masked, amount = %amount.value(), "authorization approved");
        Ok(AuthorizationOutcome::approved())
    }

    pub async fn create_card(&self, card: CardAccount) -> Result<CardAccount> {
        self.cards.store(card.clone()).await?;
        info!(card = %mask_card_number(&card.card_number), "card created");
        Ok(card)
    }

    pub async fn get_card(&self, card_number: &str) -> Result<Option<CardAccount>> {
        self.cards.get(card_number).await
    }

    pub async fn list_cards(&self) -> Result<Vec<CardAccount>> {
        self.cards.get_all().await
    }

    pub async fn update_card(&self, card_number: &str, update: CardUpdate) -> Result<CardAccount> {
        let lock = self.locks.lock_for(card_number);
        let _guard = lock.lock().await;

        let mut card = self.require(card_number).await?;
        if let Some(expiration) = update.expiration {
            card.expiration = expiration;
        }
        if let Some(cvv) = update.cvv {
            card.cvv = cvv;
        }
        if let Some(balance) = update.balance {
            if balance < rust_decimal::Decimal::ZERO {
                return Err(PaymentError::ValidationError(
                    "Balance must not be negative".to_string(),
                ));
            }
            card.balance = Balance::new(balance);
        }
        if let Some(active) = update.active {
            card.active = active;
        }
        self.cards.store(card.clone()).await?;
        Ok(card)
    }

    pub async fn delete_card(&self, card_number: &str) -> Result<()> {
        let lock = self.locks.lock_for(card_number);
        let _guard = lock.lock().await;

        warn!(card = %mask_card_number(card_number), "card deleted");
        self.cards.delete(card_number).await
    }

    /// Administrative credit, the only non-authorization balance mutation.
    pub async fn top_up(&self, card_number: &str, amount: Amount) -> Result<CardAccount> {
        let lock = self.locks.lock_for(card_number);
        let _guard = lock.lock().await;

        let mut card = self.require(card_number).await?;
        card.credit(amount);
        self.cards.store(card.clone()).await?;
        info!(card = %mask_card_number(card_number), amount = %amount.value(), "card topped up");
        Ok(card)
    }

    async fn require(&self, card_number: &str) -> Result<CardAccount> {
        self.cards
            .get(card_number)
            .await?
            .ok_or_else(|| PaymentError::NotFound(format!("card {}", mask_card_number(card_number))))
    }
}

#[async_trait]
impl CardAuthorizer for BankCore {
    async fn authorize_payment(
        &self,
        request: AuthorizationRequest,
    ) -> Result<AuthorizationOutcome> {
        self.authorize(request).await
    }
}
