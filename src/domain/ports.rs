use super::authorization::{AuthorizationOutcome, AuthorizationRequest};
use super::card::CardAccount;
use super::payment::{PaymentRecord, PaymentRequest};
use super::token::MobileToken;
use super::transaction::{TransactionOutcome, TransactionRecord};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait CardStore: Send + Sync {
    async fn store(&self, card: CardAccount) -> Result<()>;
    async fn get(&self, card_number: &str) -> Result<Option<CardAccount>>;
    async fn get_all(&self) -> Result<Vec<CardAccount>>;
    async fn delete(&self, card_number: &str) -> Result<()>;
}

#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn next_id(&self) -> Result<u64>;
    async fn store(&self, payment: PaymentRecord) -> Result<()>;
    async fn get(&self, id: u64) -> Result<Option<PaymentRecord>>;
    async fn get_all(&self) -> Result<Vec<PaymentRecord>>;
}

#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn next_id(&self) -> Result<u64>;
    async fn store(&self, transaction: TransactionRecord) -> Result<()>;
    async fn get(&self, id: u64) -> Result<Option<TransactionRecord>>;
    async fn get_all(&self) -> Result<Vec<TransactionRecord>>;
}

#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn next_id(&self) -> Result<u64>;
    async fn store(&self, token: MobileToken) -> Result<()>;
    async fn get(&self, id: u64) -> Result<Option<MobileToken>>;
    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<MobileToken>>;
}

/// The transaction processor's view of the bank core.
///
/// A transport failure is an `Err`; a business denial is a normal
/// `AuthorizationOutcome` with `success: false`.
#[async_trait]
pub trait CardAuthorizer: Send + Sync {
    async fn authorize_payment(
        &self,
        request: AuthorizationRequest,
    ) -> Result<AuthorizationOutcome>;
}

/// The gateway's view of the transaction processor.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    async fn process(&self, request: PaymentRequest) -> Result<TransactionOutcome>;
}

pub type CardStoreRef = Arc<dyn CardStore>;
pub type PaymentStoreRef = Arc<dyn PaymentStore>;
pub type TransactionStoreRef = Arc<dyn TransactionStore>;
pub type TokenStoreRef = Arc<dyn TokenStore>;
pub type CardAuthorizerRef = Arc<dyn CardAuthorizer>;
pub type PaymentProcessorRef = Arc<dyn PaymentProcessor>;
