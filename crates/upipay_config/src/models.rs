// --- File: crates/upipay_config/src/models.rs ---

use serde::{Deserialize, Serialize};
use std::fmt;

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Which payer-facing artifact `/upi/collect` creates on the gateway.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CollectMode {
    /// `POST /v1/orders`
    #[default]
    Order,
    /// `POST /v1/payment_links`
    PaymentLink,
}

// --- Razorpay Config ---
// key_id, key_secret and account_number are treated as secrets and are
// normally injected from the environment (see env_vars.rs).
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Deserialize, Serialize, Clone)]
pub struct RazorpayConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub key_id: String,
    #[serde(default)]
    pub key_secret: String,
    /// RazorpayX source account debited by payouts.
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Skip the payout call and answer with a placeholder payout.
    #[serde(default)]
    pub sandbox_mode: bool,
    #[serde(default)]
    pub collect_mode: CollectMode,
    /// Timeout applied to every single gateway call.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Budget for a whole inbound request, spanning all gateway calls it makes.
    #[serde(default = "default_request_deadline_secs")]
    pub request_deadline_secs: u64,
}

fn default_base_url() -> String {
    "https://api.razorpay.com".to_string()
}

fn default_currency() -> String {
    "INR".to_string()
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_request_deadline_secs() -> u64 {
    45
}

impl Default for RazorpayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            key_id: String::new(),
            key_secret: String::new(),
            account_number: None,
            currency: default_currency(),
            sandbox_mode: false,
            collect_mode: CollectMode::default(),
            request_timeout_secs: default_request_timeout_secs(),
            request_deadline_secs: default_request_deadline_secs(),
        }
    }
}

impl RazorpayConfig {
    /// Both halves of the basic-auth credential are present.
    pub fn has_credentials(&self) -> bool {
        !self.key_id.is_empty() && !self.key_secret.is_empty()
    }

    /// The payout source account, if one is configured and non-empty.
    pub fn payout_account(&self) -> Option<&str> {
        self.account_number.as_deref().filter(|a| !a.is_empty())
    }
}

// Secrets never end up in logs.
impl fmt::Debug for RazorpayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RazorpayConfig")
            .field("base_url", &self.base_url)
            .field("key_id", &redact(&self.key_id))
            .field("key_secret", &redact(&self.key_secret))
            .field(
                "account_number",
                &self.account_number.as_deref().map(redact),
            )
            .field("currency", &self.currency)
            .field("sandbox_mode", &self.sandbox_mode)
            .field("collect_mode", &self.collect_mode)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("request_deadline_secs", &self.request_deadline_secs)
            .finish()
    }
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_razorpay: bool,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub razorpay: Option<RazorpayConfig>,
}
