use crate::domain::payment::PaymentRequest;
use crate::domain::ports::PaymentProcessor;
use crate::domain::transaction::TransactionOutcome;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

/// HTTP client for the transaction processor's intake endpoint.
#[derive(Clone)]
pub struct TransactionClient {
    http: reqwest::Client,
    base_url: String,
}

impl TransactionClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl PaymentProcessor for TransactionClient {
    async fn process(&self, request: PaymentRequest) -> Result<TransactionOutcome> {
        debug!(url = %self.base_url, "calling transaction processor");
        let response = self
            .http
            .post(format!("{}/api/transactions", self.base_url))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::BAD_REQUEST {
            Err(PaymentError::ValidationError(body))
        } else {
            Err(PaymentError::TransportError(format!(
                "transaction processor returned {status}: {body}"
            )))
        }
    }
}
