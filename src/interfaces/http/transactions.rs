use super::ApiError;
use crate::application::transactions::TransactionService;
use crate::domain::payment::PaymentRequest;
use crate::domain::transaction::{TransactionOutcome, TransactionRecord};
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;

#[derive(Clone)]
pub struct TransactionsState {
    pub transactions: Arc<TransactionService>,
}

pub fn transactions_router(state: TransactionsState) -> Router {
    Router::new()
        .route("/api/transactions", post(process).get(list))
        .route("/api/transactions/:id", get(get_by_id))
        .with_state(state)
}

async fn process(
    State(state): State<TransactionsState>,
    Json(request): Json<PaymentRequest>,
) -> Result<Json<TransactionOutcome>, ApiError> {
    Ok(Json(state.transactions.process(request).await?))
}

async fn list(
    State(state): State<TransactionsState>,
) -> Result<Json<Vec<TransactionRecord>>, ApiError> {
    Ok(Json(state.transactions.find_all().await?))
}

async fn get_by_id(
    State(state): State<TransactionsState>,
    Path(id): Path<u64>,
) -> Result<Json<TransactionRecord>, ApiError> {
    state
        .transactions
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("transaction {id}")))
}
