use crate::domain::authorization::{AuthorizationOutcome, AuthorizationRequest};
use crate::domain::ports::CardAuthorizer;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

/// HTTP client for the bank core's authorization endpoint.
///
/// Carries a finite request timeout; a timeout or connection failure
/// surfaces as a transport error, never as a guessed outcome.
#[derive(Clone)]
pub struct BankClient {
    http: reqwest::Client,
    base_url: String,
}

impl BankClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl CardAuthorizer for BankClient {
    async fn authorize_payment(
        &self,
        request: AuthorizationRequest,
    ) -> Result<AuthorizationOutcome> {
        debug!(url = %self.base_url, "calling bank core");
        let response = self
            .http
            .post(format!("{}/api/bank/authorize", self.base_url))
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
                "bank core returned {status}: {body}"
            )))
        }
    }
}
