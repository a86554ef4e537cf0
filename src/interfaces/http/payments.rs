use super::ApiError;
use crate::application::payments::PaymentService;
use crate::application::tokens::MobileTokenService;
use crate::domain::identity::ClaimsVerifier;
use crate::domain::payment::{PaymentRecord, PaymentRequest};
use crate::domain::transaction::TransactionOutcome;
use crate::error::PaymentError;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const INSTALLATION_HEADER: &str = "x-installation-id";

#[derive(Clone)]
pub struct PaymentsState {
    pub payments: Arc<PaymentService>,
    pub tokens: Arc<MobileTokenService>,
    pub verifier: Arc<ClaimsVerifier>,
}

pub fn payments_router(state: PaymentsState) -> Router {
    Router::new()
        .route("/api/payments", post(create_payment).get(list))
        .route("/api/payments/:id", get(get_by_id))
        .route("/api/tokens", post(issue_token))
        .route("/api/tokens/:id/revoke", post(revoke_token))
        .with_state(state)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Resolves the paying identity from the request headers.
///
/// The bearer secret is tried against the mobile-token store first; if no
/// token record matches its hash, the bearer is verified as a signed session
/// claim. If neither matches, the caller stays anonymous.
async fn resolve_payer(
    state: &PaymentsState,
    headers: &HeaderMap,
) -> Result<Option<u64>, PaymentError> {
    let Some(bearer) = bearer_token(headers) else {
        return Ok(None);
    };
    let installation = headers
        .get(INSTALLATION_HEADER)
        .and_then(|value| value.to_str().ok());

    if let Some(payer_id) = state.tokens.validate(bearer, installation).await? {
        return Ok(Some(payer_id));
    }
    Ok(state.verifier.verify(bearer).map(|claims| claims.payer_id))
}

async fn create_payment(
    State(state): State<PaymentsState>,
    headers: HeaderMap,
    Json(request): Json<PaymentRequest>,
) -> Result<Json<TransactionOutcome>, ApiError> {
    let payer_id = resolve_payer(&state, &headers).await?;
    Ok(Json(state.payments.create_payment(request, payer_id).await?))
}

async fn list(State(state): State<PaymentsState>) -> Result<Json<Vec<PaymentRecord>>, ApiError> {
    Ok(Json(state.payments.find_all().await?))
}

async fn get_by_id(
    State(state): State<PaymentsState>,
    Path(id): Path<u64>,
) -> Result<Json<PaymentRecord>, ApiError> {
    state
        .payments
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("payment {id}")))
}

#[derive(Debug, Deserialize)]
struct IssueTokenQuery {
    ttl_days: Option<i64>,
}

#[derive(Debug, Serialize)]
struct IssuedToken {
    token: String,
}

async fn issue_token(
    State(state): State<PaymentsState>,
    Query(query): Query<IssueTokenQuery>,
    headers: HeaderMap,
) -> Result<Json<IssuedToken>, ApiError> {
    let payer_id = resolve_payer(&state, &headers)
        .await?
        .ok_or_else(|| ApiError::unauthorized("authentication required"))?;
    let token = state.tokens.issue(payer_id, query.ttl_days).await?;
    Ok(Json(IssuedToken { token }))
}

async fn revoke_token(
    State(state): State<PaymentsState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let payer_id = resolve_payer(&state, &headers)
        .await?
        .ok_or_else(|| ApiError::unauthorized("authentication required"))?;
    state.tokens.revoke(id, payer_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
