use super::ApiError;
use crate::application::bank::BankCore;
use crate::domain::authorization::{AuthorizationOutcome, AuthorizationRequest};
use crate::domain::card::{Amount, CardAccount, CardUpdate};
use crate::domain::transaction::mask_card_number;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Clone)]
pub struct BankState {
    pub bank: Arc<BankCore>,
}

pub fn bank_router(state: BankState) -> Router {
    Router::new()
        .route("/api/bank/authorize", post(authorize))
        .route("/api/admin/cards", post(create_card).get(list_cards))
        .route(
            "/api/admin/cards/:card_number",
            get(get_card).put(update_card).delete(delete_card),
        )
        .route("/api/admin/cards/:card_number/topup", post(top_up))
        .with_state(state)
}

async fn authorize(
    State(state): State<BankState>,
    Json(request): Json<AuthorizationRequest>,
) -> Result<Json<AuthorizationOutcome>, ApiError> {
    Ok(Json(state.bank.authorize(request).await?))
}

async fn create_card(
    State(state): State<BankState>,
    Json(card): Json<CardAccount>,
) -> Result<Json<CardAccount>, ApiError> {
    Ok(Json(state.bank.create_card(card).await?))
}

async fn list_cards(State(state): State<BankState>) -> Result<Json<Vec<CardAccount>>, ApiError> {
    Ok(Json(state.bank.list_cards().await?))
}

async fn get_card(
    State(state): State<BankState>,
    Path(card_number): Path<String>,
) -> Result<Json<CardAccount>, ApiError> {
    state
        .bank
        .get_card(&card_number)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("card {}", mask_card_number(&card_number))))
}

async fn update_card(
    State(state): State<BankState>,
    Path(card_number): Path<String>,
    Json(update): Json<CardUpdate>,
) -> Result<Json<CardAccount>, ApiError> {
    Ok(Json(state.bank.update_card(&card_number, update).await?))
}

async fn delete_card(
    State(state): State<BankState>,
    Path(card_number): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.bank.delete_card(&card_number).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
struct TopUpRequest {
    amount: Decimal,
}

async fn top_up(
    State(state): State<BankState>,
    Path(card_number): Path<String>,
    Json(request): Json<TopUpRequest>,
) -> Result<Json<CardAccount>, ApiError> {
    let amount = Amount::new(request.amount).map_err(ApiError::Core)?;
    Ok(Json(state.bank.top_up(&card_number, amount).await?))
}
