//! Axum routers for the three services.
//!
//! Handlers stay thin: deserialize, call the application service, map the
//! result. Business denials travel as normal responses; only validation,
//! missing records, and infrastructure faults become error statuses.

pub mod bank;
pub mod payments;
pub mod transactions;

use crate::error::PaymentError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Http { status: StatusCode, message: String },
    #[error(transparent)]
    Core(#[from] PaymentError),
}

impl ApiError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Http {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::Http {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Http { status, message } => (status, message),
            Self::Core(err) => {
                let status = match &err {
                    PaymentError::ValidationError(_) => StatusCode::BAD_REQUEST,
                    PaymentError::NotFound(_) => StatusCode::NOT_FOUND,
                    PaymentError::TransportError(_) => StatusCode::BAD_GATEWAY,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, err.to_string())
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
