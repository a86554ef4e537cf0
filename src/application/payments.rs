use crate::domain::card::Amount;
use crate::domain::payment::{PaymentRecord, PaymentRequest, card_last4};
use crate::domain::ports::{PaymentProcessorRef, PaymentStoreRef};
use crate::domain::transaction::TransactionOutcome;
use crate::error::{PaymentError, Result};
use tracing::info;

/// The caller-facing gateway owning the payment record and the end-to-end
/// response.
///
/// A payment is persisted as CREATED before the processor is called; if the
/// call fails at the transport level the record stays CREATED ("outcome
/// unknown") for an out-of-band reconciliation job to find. FAILED always
/// means the bank explicitly denied the payment.
pub struct PaymentService {
    payments: PaymentStoreRef,
    processor: PaymentProcessorRef,
}

impl PaymentService {
    pub fn new(payments: PaymentStoreRef, processor: PaymentProcessorRef) -> Self {
        Self { payments, processor }
    }

    pub async fn create_payment(
        &self,
        mut request: PaymentRequest,
        payer_id: Option<u64>,
    ) -> Result<TransactionOutcome> {
        // Rejected before any record or remote call.
        let amount = Amount::new(request.amount)?;

        let id = self.payments.next_id().await?;
        let record = PaymentRecord::new(id, amount, card_last4(&request.card_number), payer_id);
        self.payments.store(record).await?;
        info!(payment = id, "payment created");

        // The identity resolved here overrides anything the caller sent.
        request.payer_id = payer_id;

        let outcome = self.processor.process(request).await?;

        let mut record = self
            .payments
            .get(id)
            .await?
            .ok_or_else(|| PaymentError::StorageError(format!("payment {id} vanished")))?;
        record.finalize(outcome.success)?;
        self.payments.store(record).await?;
        info!(payment = id, success = outcome.success, "payment finalized");

        Ok(outcome)
    }

    pub async fn find_all(&self) -> Result<Vec<PaymentRecord>> {
        self.payments.get_all().await
    }

    pub async fn find_by_id(&self, id: u64) -> Result<Option<PaymentRecord>> {
        self.payments.get(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::authorization::AuthorizationCode;
    use crate::domain::payment::PaymentStatus;
    use crate::domain::ports::{PaymentProcessor, PaymentStore};
    use crate::infrastructure::in_memory::InMemoryPaymentStore;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    struct StaticProcessor {
        success: bool,
        seen_payer: std::sync::Mutex<Option<Option<u64>>>,
    }

    impl StaticProcessor {
        fn new(success: bool) -> Self {
            Self {
                success,
                seen_payer: std::sync::Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl PaymentProcessor for StaticProcessor {
        async fn process(&self, request: PaymentRequest) -> Result<TransactionOutcome> {
            *self.seen_payer.lock().unwrap() = Some(request.payer_id);
            Ok(TransactionOutcome {
                success: self.success,
                code: if self.success {
                    AuthorizationCode::Ok
                } else {
                    AuthorizationCode::InsufficientFunds
                },
                message: String::new(),
                transaction_id: 1,
            })
        }
    }

    struct UnreachableProcessor;

    #[async_trait]
    impl PaymentProcessor for UnreachableProcessor {
        async fn process(&self, _request: PaymentRequest) -> Result<TransactionOutcome> {
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
            payer_id: None,
        }
    }

    #[tokio::test]
    async fn test_successful_payment_reaches_success() {
        let store = Arc::new(InMemoryPaymentStore::new());
        let service = PaymentService::new(store.clone(), Arc::new(StaticProcessor::new(true)));

        let outcome = service.create_payment(payment_request(), Some(7)).await.unwrap();
        assert!(outcome.success);

        let payments = store.get_all().await.unwrap();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].status, PaymentStatus::Success);
        assert_eq!(payments[0].payer_id, Some(7));
        assert_eq!(payments[0].card_last4.as_deref(), Some("2345"));
    }

    #[tokio::test]
    async fn test_denied_payment_reaches_failed() {
        let store = Arc::new(InMemoryPaymentStore::new());
        let service = PaymentService::new(store.clone(), Arc::new(StaticProcessor::new(false)));

        let outcome = service.create_payment(payment_request(), None).await.unwrap();
        assert!(!outcome.success);

        let payments = store.get_all().await.unwrap();
        assert_eq!(payments[0].status, PaymentStatus::Failed);
    }

    #[tokio::test]
    async fn test_transport_failure_leaves_payment_created() {
        let store = Arc::new(InMemoryPaymentStore::new());
        let service = PaymentService::new(store.clone(), Arc::new(UnreachableProcessor));

        let result = service.create_payment(payment_request(), None).await;
        assert!(matches!(result, Err(PaymentError::TransportError(_))));

        // Outcome unknown: the record must stay CREATED, not FAILED.
        let payments = store.get_all().await.unwrap();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].status, PaymentStatus::Created);
    }

    #[tokio::test]
    async fn test_invalid_amount_creates_nothing() {
        let store = Arc::new(InMemoryPaymentStore::new());
        let service = PaymentService::new(store.clone(), Arc::new(UnreachableProcessor));

        let mut request = payment_request();
        request.amount = dec!(0);
        let result = service.create_payment(request, None).await;
        assert!(matches!(result, Err(PaymentError::ValidationError(_))));
        assert!(store.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_resolved_identity_overrides_caller_supplied() {
        let store = Arc::new(InMemoryPaymentStore::new());
        let processor = Arc::new(StaticProcessor::new(true));
        let service = PaymentService::new(store, processor.clone());

        let mut request = payment_request();
        request.payer_id = Some(999); // forged by the caller
        service.create_payment(request, Some(7)).await.unwrap();

        assert_eq!(*processor.seen_payer.lock().unwrap(), Some(Some(7)));
    }
}
