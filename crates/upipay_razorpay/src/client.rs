// --- File: crates/upipay_razorpay/src/client.rs ---
//! Authenticated JSON-over-HTTP calls to the Razorpay REST API.
//!
//! The client does not interpret gateway status codes: whatever JSON the
//! gateway answers with, success or error, is handed back to the caller.

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use upipay_common::create_client;
use upipay_config::RazorpayConfig;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// The fixed gateway endpoints this service talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayEndpoint {
    Orders,
    PaymentLinks,
    Contacts,
    FundAccounts,
    Payouts,
}

impl GatewayEndpoint {
    pub fn path(&self) -> &'static str {
        match self {
            GatewayEndpoint::Orders => "/v1/orders",
            GatewayEndpoint::PaymentLinks => "/v1/payment_links",
            GatewayEndpoint::Contacts => "/v1/contacts",
            GatewayEndpoint::FundAccounts => "/v1/fund_accounts",
            GatewayEndpoint::Payouts => "/v1/payouts",
        }
    }
}

impl fmt::Display for GatewayEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Errors raised by a single gateway call.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Connection failure, timeout, or the body could not be read.
    #[error("request to {endpoint} failed: {message}")]
    Transport {
        endpoint: GatewayEndpoint,
        message: String,
        timed_out: bool,
    },

    /// The gateway answered, but not with a JSON document.
    #[error("{endpoint} answered HTTP {status} with a body that is not JSON: {message}")]
    InvalidResponseBody {
        endpoint: GatewayEndpoint,
        status: u16,
        message: String,
    },
}

impl GatewayError {
    fn transport(endpoint: GatewayEndpoint, err: reqwest::Error) -> Self {
        GatewayError::Transport {
            endpoint,
            timed_out: err.is_timeout(),
            message: err.to_string(),
        }
    }

    pub fn endpoint(&self) -> GatewayEndpoint {
        match self {
            GatewayError::Transport { endpoint, .. }
            | GatewayError::InvalidResponseBody { endpoint, .. } => *endpoint,
        }
    }
}

/// One authenticated JSON POST to a gateway endpoint.
///
/// Implementations perform exactly one round trip per call and never retry.
pub trait GatewayClient: Send + Sync {
    fn call(
        &self,
        endpoint: GatewayEndpoint,
        payload: Value,
        timeout: Duration,
    ) -> BoxFuture<'_, Value, GatewayError>;
}

/// `reqwest`-backed client for the live Razorpay API.
pub struct RazorpayClient {
    http: Client,
    base_url: String,
    key_id: String,
    key_secret: String,
}

impl RazorpayClient {
    /// Builds the client from immutable configuration read at startup.
    pub fn new(config: &RazorpayConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            http: create_client(Duration::from_secs(config.request_timeout_secs), false)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.clone(),
        })
    }

    fn url(&self, endpoint: GatewayEndpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }
}

impl GatewayClient for RazorpayClient {
    fn call(
        &self,
        endpoint: GatewayEndpoint,
        payload: Value,
        timeout: Duration,
    ) -> BoxFuture<'_, Value, GatewayError> {
        Box::pin(async move {
            let url = self.url(endpoint);
            debug!(%endpoint, "Sending request to Razorpay");

            let response = self
                .http
                .post(&url)
                .header(CONTENT_TYPE, "application/json")
                .basic_auth(&self.key_id, Some(&self.key_secret))
                .json(&payload)
                .timeout(timeout)
                .send()
                .await
                .map_err(|e| GatewayError::transport(endpoint, e))?;

            let status = response.status();
            let body = response
                .bytes()
                .await
                .map_err(|e| GatewayError::transport(endpoint, e))?;

            debug!(%endpoint, status = status.as_u16(), body = %String::from_utf8_lossy(&body), "Razorpay response");

            serde_json::from_slice(&body).map_err(|e| GatewayError::InvalidResponseBody {
                endpoint,
                status: status.as_u16(),
                message: e.to_string(),
            })
        })
    }
}
