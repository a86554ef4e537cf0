use crate::domain::card::CardAccount;
use crate::domain::payment::PaymentRecord;
use crate::domain::ports::{CardStore, PaymentStore, TokenStore, TransactionStore};
use crate::domain::token::MobileToken;
use crate::domain::transaction::TransactionRecord;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// A thread-safe in-memory store for card accounts.
///
/// Uses `Arc<RwLock<HashMap>>` to allow shared concurrent access. Ideal for
/// testing or single-process deployments where persistence is not required.
#[derive(Default, Clone)]
pub struct InMemoryCardStore {
    cards: Arc<RwLock<HashMap<String, CardAccount>>>,
}

impl InMemoryCardStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CardStore for InMemoryCardStore {
    async fn store(&self, card: CardAccount) -> Result<()> {
        let mut cards = self.cards.write().await;
        cards.insert(card.card_number.clone(), card);
        Ok(())
    }

    async fn get(&self, card_number: &str) -> Result<Option<CardAccount>> {
        let cards = self.cards.read().await;
        Ok(cards.get(card_number).cloned())
    }

    async fn get_all(&self) -> Result<Vec<CardAccount>> {
        let cards = self.cards.read().await;
        let mut all: Vec<_> = cards.values().cloned().collect();
        all.sort_by(|a, b| a.card_number.cmp(&b.card_number));
        Ok(all)
    }

    async fn delete(&self, card_number: &str) -> Result<()> {
        let mut cards = self.cards.write().await;
        cards.remove(card_number);
        Ok(())
    }
}

/// In-memory payment store with a generated id sequence.
#[derive(Default, Clone)]
pub struct InMemoryPaymentStore {
    payments: Arc<RwLock<HashMap<u64, PaymentRecord>>>,
    sequence: Arc<AtomicU64>,
}

impl InMemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn next_id(&self) -> Result<u64> {
        Ok(self.sequence.fetch_add(1, Ordering::SeqCst) + 1)
    }

    async fn store(&self, payment: PaymentRecord) -> Result<()> {
        let mut payments = self.payments.write().await;
        payments.insert(payment.id, payment);
        Ok(())
    }

    async fn get(&self, id: u64) -> Result<Option<PaymentRecord>> {
        let payments = self.payments.read().await;
        Ok(payments.get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<PaymentRecord>> {
        let payments = self.payments.read().await;
        let mut all: Vec<_> = payments.values().cloned().collect();
        all.sort_by_key(|payment| payment.id);
        Ok(all)
    }
}

/// In-memory transaction store with a generated id sequence.
#[derive(Default, Clone)]
pub struct InMemoryTransactionStore {
    transactions: Arc<RwLock<HashMap<u64, TransactionRecord>>>,
    sequence: Arc<AtomicU64>,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn next_id(&self) -> Result<u64> {
        Ok(self.sequence.fetch_add(1, Ordering::SeqCst) + 1)
    }

    async fn store(&self, transaction: TransactionRecord) -> Result<()> {
        let mut transactions = self.transactions.write().await;
        transactions.insert(transaction.id, transaction);
        Ok(())
    }

    async fn get(&self, id: u64) -> Result<Option<TransactionRecord>> {
        let transactions = self.transactions.read().await;
        Ok(transactions.get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<TransactionRecord>> {
        let transactions = self.transactions.read().await;
        let mut all: Vec<_> = transactions.values().cloned().collect();
        all.sort_by_key(|transaction| transaction.id);
        Ok(all)
    }
}

/// In-memory mobile-token store.
///
/// Lookup by hash scans the map; token counts per deployment are small.
#[derive(Default, Clone)]
pub struct InMemoryTokenStore {
    tokens: Arc<RwLock<HashMap<u64, MobileToken>>>,
    sequence: Arc<AtomicU64>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn next_id(&self) -> Result<u64> {
        Ok(self.sequence.fetch_add(1, Ordering::SeqCst) + 1)
    }

    async fn store(&self, token: MobileToken) -> Result<()> {
        let mut tokens = self.tokens.write().await;
        tokens.insert(token.id, token);
        Ok(())
    }

    async fn get(&self, id: u64) -> Result<Option<MobileToken>> {
        let tokens = self.tokens.read().await;
        Ok(tokens.get(&id).cloned())
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<MobileToken>> {
        let tokens = self.tokens.read().await;
        Ok(tokens
            .values()
            .find(|token| token.token_hash == token_hash)
            .cloned())
    }
}
