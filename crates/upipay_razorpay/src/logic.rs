// --- File: crates/upipay_razorpay/src/logic.rs ---
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

use upipay_config::{CollectMode, RazorpayConfig};

use crate::amount::normalize;
use crate::client::{GatewayClient, GatewayEndpoint, GatewayError};
use crate::error::RazorpayError;

/// Placeholder contact details used when a payout creates its own contact.
pub const PLACEHOLDER_EMAIL: &str = "user@example.com";
pub const PLACEHOLDER_PHONE: &str = "9999999999";

/// Point in time after which no further gateway call is started.
///
/// A budget too large for the platform clock never expires.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    expires_at: Option<Instant>,
}

impl Deadline {
    pub fn after(budget: Duration) -> Self {
        Self {
            expires_at: Instant::now().checked_add(budget),
        }
    }

    /// Time left, or `None` once the deadline has passed.
    pub fn remaining(&self) -> Option<Duration> {
        match self.expires_at {
            Some(expires_at) => expires_at
                .checked_duration_since(Instant::now())
                .filter(|left| !left.is_zero()),
            None => Some(Duration::MAX),
        }
    }
}

/// Treats an absent or empty query value as missing.
pub fn required(value: Option<&str>) -> Result<&str, RazorpayError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(RazorpayError::MissingParameters)
}

/// The `id` field of a gateway response, when it is a string.
pub fn extract_id(response: &Value) -> Option<&str> {
    response.get("id").and_then(Value::as_str)
}

/// Contact fields sent to `/v1/contacts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl ContactDetails {
    /// The throwaway contact a payout creates for `user_id`.
    pub fn placeholder_for(user_id: &str) -> Self {
        Self {
            name: format!("User {}", user_id),
            email: PLACEHOLDER_EMAIL.to_string(),
            phone: PLACEHOLDER_PHONE.to_string(),
        }
    }

    fn payload(&self) -> Value {
        json!({
            "name": self.name,
            "email": self.email,
            "contact": self.phone,
            "type": "customer",
        })
    }
}

fn fund_account_payload(contact_id: &str, upi_id: &str) -> Value {
    json!({
        "contact_id": contact_id,
        "account_type": "vpa",
        "vpa": { "address": upi_id },
    })
}

fn order_payload(amount: i64, currency: &str, user_id: &str) -> Value {
    json!({
        "amount": amount,
        "currency": currency,
        "payment_capture": 1,
        "notes": { "user_id": user_id },
    })
}

fn payment_link_payload(amount: i64, currency: &str, user_id: &str) -> Value {
    json!({
        "amount": amount,
        "currency": currency,
        "description": format!("UPI top-up for user {}", user_id),
        "upi_link": true,
        "notes": { "user_id": user_id },
    })
}

/// Gateway access scoped to one inbound request.
///
/// Every call made through a session shares the request's [`Deadline`];
/// each individual call is further capped by `request_timeout_secs`.
pub struct GatewaySession<'a> {
    gateway: &'a dyn GatewayClient,
    config: &'a RazorpayConfig,
    deadline: Deadline,
}

impl<'a> GatewaySession<'a> {
    pub fn new(gateway: &'a dyn GatewayClient, config: &'a RazorpayConfig) -> Self {
        let deadline = Deadline::after(Duration::from_secs(config.request_deadline_secs));
        Self {
            gateway,
            config,
            deadline,
        }
    }

    pub fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn config(&self) -> &RazorpayConfig {
        self.config
    }

    pub(crate) async fn send<F>(
        &self,
        endpoint: GatewayEndpoint,
        payload: Value,
        on_error: F,
    ) -> Result<Value, RazorpayError>
    where
        F: FnOnce(GatewayError) -> RazorpayError,
    {
        let Some(remaining) = self.deadline.remaining() else {
            warn!(%endpoint, "Request deadline exhausted, not calling Razorpay");
            return Err(RazorpayError::DeadlineExceeded { endpoint });
        };
        let timeout = remaining.min(Duration::from_secs(self.config.request_timeout_secs));

        self.gateway
            .call(endpoint, payload, timeout)
            .await
            .map_err(|e| {
                error!(%endpoint, error = %e, "Razorpay call failed");
                on_error(e)
            })
    }

    /// Creates a contact and returns its id.
    pub async fn create_contact(&self, contact: &ContactDetails) -> Result<String, RazorpayError> {
        let response = self
            .send(
                GatewayEndpoint::Contacts,
                contact.payload(),
                RazorpayError::ContactCreationFailed,
            )
            .await?;

        match extract_id(&response) {
            Some(id) => {
                info!(contact_id = %id, "Contact created");
                Ok(id.to_string())
            }
            None => {
                error!(response = %response, "Contact response has no id");
                Err(RazorpayError::ContactIdMissing)
            }
        }
    }

    /// Creates a UPI (VPA) fund account under `contact_id` and returns its id.
    pub async fn create_fund_account(
        &self,
        contact_id: &str,
        upi_id: &str,
    ) -> Result<String, RazorpayError> {
        let response = self
            .send(
                GatewayEndpoint::FundAccounts,
                fund_account_payload(contact_id, upi_id),
                RazorpayError::FundAccountCreationFailed,
            )
            .await?;

        match extract_id(&response) {
            Some(id) => {
                info!(%contact_id, fund_account_id = %id, "Fund account created");
                Ok(id.to_string())
            }
            None => {
                error!(%contact_id, response = %response, "Fund account response has no id");
                Err(RazorpayError::FundAccountIdMissing)
            }
        }
    }

    /// Starts a UPI collection of `amount_major_units` for `user_id`.
    ///
    /// Creates an order or a payment link depending on `collect_mode` and
    /// returns the gateway's response untouched, whatever its status.
    pub async fn collect(
        &self,
        amount_major_units: &str,
        user_id: &str,
    ) -> Result<Value, RazorpayError> {
        let amount_major_units = required(Some(amount_major_units))?;
        let user_id = required(Some(user_id))?;
        let amount = normalize(amount_major_units)?;
        let currency = self.config.currency.as_str();

        let (endpoint, payload) = match self.config.collect_mode {
            CollectMode::Order => (
                GatewayEndpoint::Orders,
                order_payload(amount, currency, user_id),
            ),
            CollectMode::PaymentLink => (
                GatewayEndpoint::PaymentLinks,
                payment_link_payload(amount, currency, user_id),
            ),
        };

        info!(%endpoint, %user_id, amount_minor_units = amount, "UPI collect request");
        let response = self
            .send(endpoint, payload, RazorpayError::CollectionRequestFailed)
            .await?;
        info!(%endpoint, %user_id, id = ?extract_id(&response), "UPI collect request answered");
        Ok(response)
    }
}
