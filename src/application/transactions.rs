use crate::domain::authorization::AuthorizationRequest;
use crate::domain::card::Amount;
use crate::domain::payment::PaymentRequest;
use crate::domain::ports::{CardAuthorizerRef, PaymentProcessor, TransactionStoreRef};
use crate::domain::transaction::{
    TransactionOutcome, TransactionRecord, TransactionStatus, mask_card_number,
};
use crate::error::Result;
use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

/// Processes payment requests by calling the bank core exactly once per
/// request and recording what the bank answered.
///
/// A transport failure propagates as an error and leaves no record: a
/// transaction record must only ever mirror an outcome the bank actually
/// returned. There is no retry at this layer.
pub struct TransactionService {
    transactions: TransactionStoreRef,
    bank: CardAuthorizerRef,
}

impl TransactionService {
    pub fn new(transactions: TransactionStoreRef, bank: CardAuthorizerRef) -> Self {
        Self { transactions, bank }
    }

    pub async fn process(&self, request: PaymentRequest) -> Result<TransactionOutcome> {
        let amount = Amount::new(request.amount)?;

        let outcome = self
            .bank
            .authorize_payment(AuthorizationRequest {
                card_number: request.card_number.clone(),
                expiration: Some(request.expiration.clone()),
                cvv: Some(request.cvv.clone()),
                amount: request.amount,
            })
            .await?;

        let id = self.transactions.next_id().await?;
        let record = TransactionRecord {
            id,
            amount,
            card_number: mask_card_number(&request.card_number),
            card_holder: request.card_holder,
            expiration: request.expiration,
            status: if outcome.success {
                TransactionStatus::Success
            } else {
                TransactionStatus::Failed
            },
            bank_code: outcome.code,
            bank_message: outcome.message.clone(),
            created_at: Utc::now(),
        };
        self.transactions.store(record).await?;
        info!(transaction = id, code = %outcome.code, "transaction recorded");

        Ok(TransactionOutcome {
            success: outcome.success,
            code: outcome.code,
            message: outcome.message,
            transaction_id: id,
        })
    }

    pub async fn find_all(&self) -> Result<Vec<TransactionRecord>> {
        self.transactions.get_all().await
    }

    pub async fn find_by_id(&self, id: u64) -> Result<Option<TransactionRecord>> {
        self.transactions.get(id).await
    }
}

#[async_trait]
impl PaymentProcessor for TransactionService {
    async fn process(&self, request: PaymentRequest) -> Result<TransactionOutcome> {
        TransactionService::process(self, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::authorization::{AuthorizationCode, AuthorizationOutcome};
    use crate::domain::ports::{CardAuthorizer, TransactionStore};
    use crate::error::PaymentError;
    use crate::infrastructure::in_memory::InMemoryTransactionStore;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    struct StaticAuthorizer(AuthorizationOutcome);

    #[async_trait]
    impl CardAuthorizer for StaticAuthorizer {
        async fn authorize_payment(
            &self,
            _request: AuthorizationRequest,
        ) -> Result<AuthorizationOutcome> {
            Ok(self.0.clone())
        }
    }

    struct UnreachableBank;

    #[async_trait]
    impl CardAuthorizer for UnreachableBank {
        async fn authorize_payment(
            &self,
            _request: AuthorizationRequest,
        ) -> Result<AuthorizationOutcome> {
            Err(PaymentError::TransportError("connection refused".to_string()))
        }
    }

    fn payment_request() -> PaymentRequest {
        PaymentRequest {
            amount: dec!(100.0),
            card_number: "4123456789012345".to_string(),
            expiration: "2027-08".to_string(),
            cvv: "123".to_string(),
            card_holder: "Ada Lovelace".to_string(),
            payer_id: Some(7),
        }
    }

    #[tokio::test]
    async fn test_approved_outcome_recorded_as_success() {
        let store = Arc::new(InMemoryTransactionStore::new());
        let service = TransactionService::new(
            store.clone(),
            Arc::new(StaticAuthorizer(AuthorizationOutcome::approved())),
        );

        let outcome = service.process(payment_request()).await.unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.code, AuthorizationCode::Ok);

        let record = store.get(outcome.transaction_id).await.unwrap().unwrap();
        assert_eq!(record.status, TransactionStatus::Success);
        assert_eq!(record.bank_code, AuthorizationCode::Ok);
        assert_eq!(record.card_number, "**** **** **** 2345");
        assert_eq!(record.card_holder, "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_denial_recorded_as_failed_not_error() {
        let store = Arc::new(InMemoryTransactionStore::new());
        let service = TransactionService::new(
            store.clone(),
            Arc::new(StaticAuthorizer(AuthorizationOutcome::denied(
                AuthorizationCode::InsufficientFunds,
            ))),
        );

        let outcome = service.process(payment_request()).await.unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.code, AuthorizationCode::InsufficientFunds);

        let record = store.get(outcome.transaction_id).await.unwrap().unwrap();
        assert_eq!(record.status, TransactionStatus::Failed);
        assert_eq!(record.bank_message, "Solde insuffisant");
    }

    #[tokio::test]
    async fn test_transport_failure_leaves_no_record() {
        let store = Arc::new(InMemoryTransactionStore::new());
        let service = TransactionService::new(store.clone(), Arc::new(UnreachableBank));

        let result = service.process(payment_request()).await;
        assert!(matches!(result, Err(PaymentError::TransportError(_))));
        assert!(store.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_amount_rejected_before_bank_call() {
        let store = Arc::new(InMemoryTransactionStore::new());
        // An unreachable bank proves the call never happens.
        let service = TransactionService::new(store.clone(), Arc::new(UnreachableBank));

        let mut request = payment_request();
        request.amount = dec!(-5);
        let result = service.process(request).await;
        assert!(matches!(result, Err(PaymentError::ValidationError(_))));
        assert!(store.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_each_request_gets_its_own_record() {
        let store = Arc::new(InMemoryTransactionStore::new());
        let service = TransactionService::new(
            store.clone(),
            Arc::new(StaticAuthorizer(AuthorizationOutcome::approved())),
        );

        let first = service.process(payment_request()).await.unwrap();
        let second = service.process(payment_request()).await.unwrap();
        assert_ne!(first.transaction_id, second.transaction_id);
        assert_eq!(store.get_all().await.unwrap().len(), 2);
    }
}
