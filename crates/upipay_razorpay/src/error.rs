// --- File: crates/upipay_razorpay/src/error.rs ---
use thiserror::Error;
use upipay_common::{config_error, invalid_input, upstream_error, HttpStatusCode, UpiPayError};

use crate::amount::InvalidAmount;
use crate::client::{GatewayEndpoint, GatewayError};

/// Razorpay-specific error types.
///
/// The display strings are what API callers see; the wrapped
/// [`GatewayError`] carries the diagnostic detail for the logs.
#[derive(Error, Debug)]
pub enum RazorpayError {
    /// A required query parameter was absent or empty
    #[error("Missing required parameters")]
    MissingParameters,

    /// The query string could not be decoded, e.g. a repeated field
    #[error("Invalid query parameters")]
    InvalidQuery(String),

    /// Amount was not a non-negative whole number
    #[error("Invalid amount format, must be a whole number")]
    InvalidAmount(#[from] InvalidAmount),

    /// The Razorpay feature is switched off or not configured
    #[error("Razorpay service is disabled")]
    Disabled,

    /// Missing or incomplete Razorpay configuration
    #[error("{0}")]
    ConfigError(String),

    #[error("Failed to create contact")]
    ContactCreationFailed(#[source] GatewayError),

    #[error("Failed to retrieve Contact ID")]
    ContactIdMissing,

    #[error("Failed to create fund account")]
    FundAccountCreationFailed(#[source] GatewayError),

    #[error("Failed to retrieve Fund Account ID")]
    FundAccountIdMissing,

    #[error("Failed to process UPI PayOut")]
    PayoutCreationFailed(#[source] GatewayError),

    #[error("Failed to initiate UPI Collect request")]
    CollectionRequestFailed(#[source] GatewayError),

    /// The request's time budget ran out before the next gateway call
    #[error("Request deadline exceeded before calling {endpoint}")]
    DeadlineExceeded { endpoint: GatewayEndpoint },
}

impl RazorpayError {
    /// Input errors are the caller's fault; everything else is downstream.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            RazorpayError::MissingParameters
                | RazorpayError::InvalidQuery(_)
                | RazorpayError::InvalidAmount(_)
        )
    }
}

/// Convert RazorpayError to UpiPayError
impl From<RazorpayError> for UpiPayError {
    fn from(err: RazorpayError) -> Self {
        match err {
            RazorpayError::MissingParameters
            | RazorpayError::InvalidQuery(_)
            | RazorpayError::InvalidAmount(_) => invalid_input(err),
            RazorpayError::Disabled => UpiPayError::Unavailable(err.to_string()),
            RazorpayError::ConfigError(msg) => config_error(msg),
            RazorpayError::DeadlineExceeded { .. } => UpiPayError::DeadlineExceeded(err.to_string()),
            RazorpayError::ContactCreationFailed(_)
            | RazorpayError::ContactIdMissing
            | RazorpayError::FundAccountCreationFailed(_)
            | RazorpayError::FundAccountIdMissing
            | RazorpayError::PayoutCreationFailed(_)
            | RazorpayError::CollectionRequestFailed(_) => upstream_error("Razorpay", err),
        }
    }
}

impl HttpStatusCode for RazorpayError {
    fn status_code(&self) -> u16 {
        match self {
            RazorpayError::MissingParameters => 400,
            RazorpayError::InvalidQuery(_) => 400,
            RazorpayError::InvalidAmount(_) => 400,
            RazorpayError::Disabled => 503,
            RazorpayError::ConfigError(_) => 500,
            RazorpayError::ContactCreationFailed(_) => 500,
            RazorpayError::ContactIdMissing => 500,
            RazorpayError::FundAccountCreationFailed(_) => 500,
            RazorpayError::FundAccountIdMissing => 500,
            RazorpayError::PayoutCreationFailed(_) => 500,
            RazorpayError::CollectionRequestFailed(_) => 500,
            RazorpayError::DeadlineExceeded { .. } => 504,
        }
    }
}
