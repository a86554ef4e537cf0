mod common;

use common::{CARD_NUMBER, payment_request, pipeline_with_cards, seeded_card};
use payrail::domain::authorization::AuthorizationCode;
use payrail::domain::card::Balance;
use payrail::domain::payment::PaymentStatus;
use payrail::domain::transaction::TransactionStatus;
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_end_to_end_success_writes_all_three_records() {
    let pipeline = pipeline_with_cards(vec![seeded_card(dec!(5000))]).await;

    let outcome = pipeline
        .payments
        .create_payment(payment_request(dec!(100)), Some(7))
        .await
        .unwrap();
    assert!(outcome.success);
    assert_eq!(outcome.code, AuthorizationCode::Ok);

    // Card balance mutated at the bank.
    let card = pipeline.bank.get_card(CARD_NUMBER).await.unwrap().unwrap();
    assert_eq!(card.balance, Balance::new(dec!(4900)));

    // One transaction record, mirroring the bank outcome, card masked.
    let transactions = pipeline.transactions.find_all().await.unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].status, TransactionStatus::Success);
    assert_eq!(transactions[0].bank_code, AuthorizationCode::Ok);
    assert_eq!(transactions[0].card_number, "**** **** **** 2345");
    assert_eq!(transactions[0].id, outcome.transaction_id);

    // Gateway record finalized to SUCCESS, storing only the last 4 digits.
    let payments = pipeline.payments.find_all().await.unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].status, PaymentStatus::Success);
    assert_eq!(payments[0].card_last4.as_deref(), Some("2345"));
    assert_eq!(payments[0].payer_id, Some(7));
}

#[tokio::test]
async fn test_denied_payment_agrees_across_records() {
    let pipeline = pipeline_with_cards(vec![seeded_card(dec!(50))]).await;

    let outcome = pipeline
        .payments
        .create_payment(payment_request(dec!(100)), None)
        .await
        .unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.code, AuthorizationCode::InsufficientFunds);

    let transactions = pipeline.transactions.find_all().await.unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].status, TransactionStatus::Failed);

    let payments = pipeline.payments.find_all().await.unwrap();
    assert_eq!(payments[0].status, PaymentStatus::Failed);

    // Denials are recorded but never debit.
    let card = pipeline.bank.get_card(CARD_NUMBER).await.unwrap().unwrap();
    assert_eq!(card.balance, Balance::new(dec!(50)));
}

#[tokio::test]
async fn test_payment_and_transaction_statuses_always_agree() {
    let pipeline = pipeline_with_cards(vec![seeded_card(dec!(250))]).await;

    // Three attempts of 100: two succeed, the third is denied.
    for _ in 0..3 {
        pipeline
            .payments
            .create_payment(payment_request(dec!(100)), None)
            .await
            .unwrap();
    }

    let payments = pipeline.payments.find_all().await.unwrap();
    let transactions = pipeline.transactions.find_all().await.unwrap();
    assert_eq!(payments.len(), 3);
    assert_eq!(transactions.len(), 3);

    for (payment, transaction) in payments.iter().zip(&transactions) {
        let agree = (payment.status == PaymentStatus::Success)
            == (transaction.status == TransactionStatus::Success);
        assert!(agree, "payment {} disagrees with its transaction", payment.id);
    }
}

#[tokio::test]
async fn test_validation_failure_creates_no_records() {
    let pipeline = pipeline_with_cards(vec![seeded_card(dec!(5000))]).await;

    let result = pipeline
        .payments
        .create_payment(payment_request(dec!(-1)), None)
        .await;
    assert!(result.is_err());

    assert!(pipeline.payments.find_all().await.unwrap().is_empty());
    assert!(pipeline.transactions.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_reads_by_id_and_absent_reads() {
    let pipeline = pipeline_with_cards(vec![seeded_card(dec!(5000))]).await;

    let outcome = pipeline
        .payments
        .create_payment(payment_request(dec!(100)), None)
        .await
        .unwrap();

    let transaction = pipeline
        .transactions
        .find_by_id(outcome.transaction_id)
        .await
        .unwrap();
    assert!(transaction.is_some());

    // Unknown ids are absent results, not errors.
    assert!(pipeline.transactions.find_by_id(9999).await.unwrap().is_none());
    assert!(pipeline.payments.find_by_id(9999).await.unwrap().is_none());
}
