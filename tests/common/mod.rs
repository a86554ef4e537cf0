use payrail::application::bank::BankCore;
use payrail::application::payments::PaymentService;
use payrail::application::tokens::MobileTokenService;
use payrail::application::transactions::TransactionService;
use payrail::domain::card::{Balance, CardAccount};
use payrail::domain::payment::PaymentRequest;
use payrail::domain::ports::{CardStoreRef, PaymentStoreRef, TransactionStoreRef};
use payrail::infrastructure::in_memory::{
    InMemoryCardStore, InMemoryPaymentStore, InMemoryTokenStore, InMemoryTransactionStore,
};
use rust_decimal::Decimal;
use std::sync::Arc;

pub const CARD_NUMBER: &str = "4123456789012345";
pub const EXPIRATION: &str = "2027-08";
pub const CVV: &str = "123";

pub fn seeded_card(balance: Decimal) -> CardAccount {
    let mut card = CardAccount::new(CARD_NUMBER, EXPIRATION, CVV);
    card.balance = Balance::new(balance);
    card
}

pub fn payment_request(amount: Decimal) -> PaymentRequest {
    PaymentRequest {
        amount,
        card_number: CARD_NUMBER.to_string(),
        expiration: EXPIRATION.to_string(),
        cvv: CVV.to_string(),
        card_holder: "Ada Lovelace".to_string(),
        payer_id: None,
    }
}

/// The full pipeline wired in-process: gateway -> transaction service -> bank
/// core, sharing no HTTP but the exact same ports production uses.
pub struct Pipeline {
    pub bank: Arc<BankCore>,
    pub transactions: Arc<TransactionService>,
    pub payments: Arc<PaymentService>,
    pub tokens: Arc<MobileTokenService>,
}

pub async fn pipeline_with_cards(cards: Vec<CardAccount>) -> Pipeline {
    let card_store: CardStoreRef = Arc::new(InMemoryCardStore::new());
    for card in cards {
        card_store.store(card).await.unwrap();
    }
    let bank = Arc::new(BankCore::new(card_store));

    let transaction_store: TransactionStoreRef = Arc::new(InMemoryTransactionStore::new());
    let transactions = Arc::new(TransactionService::new(transaction_store, bank.clone()));

    let payment_store: PaymentStoreRef = Arc::new(InMemoryPaymentStore::new());
    let payments = Arc::new(PaymentService::new(payment_store, transactions.clone()));

    let tokens = Arc::new(MobileTokenService::new(Arc::new(InMemoryTokenStore::new())));

    Pipeline {
        bank,
        transactions,
        payments,
        tokens,
    }
}
