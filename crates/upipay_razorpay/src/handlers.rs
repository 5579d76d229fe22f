// --- File: crates/upipay_razorpay/src/handlers.rs ---
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::{Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use upipay_common::{map_json_error, UpiPayError};
use upipay_config::AppConfig;

use crate::client::{GatewayClient, RazorpayClient};
use crate::error::RazorpayError;
use crate::logic::{required, ContactDetails, GatewaySession};
use crate::payout::{upi_payout, PayoutRequest};

// --- State for Razorpay Handlers ---
// The gateway client is built once from the immutable config at startup.
#[derive(Clone)]
pub struct RazorpayState {
    pub config: Arc<AppConfig>,
    pub gateway: Option<Arc<dyn GatewayClient>>,
}

impl RazorpayState {
    /// Builds the live Razorpay client when the feature is enabled and configured.
    pub fn from_config(config: Arc<AppConfig>) -> Result<Self, reqwest::Error> {
        let gateway = match config.razorpay.as_ref() {
            Some(razorpay) if config.use_razorpay => {
                Some(Arc::new(RazorpayClient::new(razorpay)?) as Arc<dyn GatewayClient>)
            }
            _ => None,
        };
        Ok(Self { config, gateway })
    }

    pub fn with_gateway(config: Arc<AppConfig>, gateway: Arc<dyn GatewayClient>) -> Self {
        Self {
            config,
            gateway: Some(gateway),
        }
    }

    fn session(&self) -> Result<GatewaySession<'_>, RazorpayError> {
        if !self.config.use_razorpay {
            return Err(RazorpayError::Disabled);
        }
        let razorpay = self.config.razorpay.as_ref().ok_or_else(|| {
            RazorpayError::ConfigError("Razorpay configuration not loaded".to_string())
        })?;
        let gateway = self.gateway.as_deref().ok_or_else(|| {
            RazorpayError::ConfigError("Razorpay client not initialized".to_string())
        })?;
        Ok(GatewaySession::new(gateway, razorpay))
    }
}

/// Unwraps the query extractor, turning axum's plain-text rejection into ours.
fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, RazorpayError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| RazorpayError::InvalidQuery(rejection.body_text()))
}

fn to_api_error(err: RazorpayError) -> UpiPayError {
    match &err {
        RazorpayError::InvalidQuery(detail) => warn!(%detail, "Rejected malformed query string"),
        e if e.is_invalid_input() => warn!(error = %e, "Rejected request"),
        RazorpayError::ConfigError(_) | RazorpayError::Disabled => {
            error!(error = %err, "Razorpay is not usable with the current configuration")
        }
        // Gateway failures are logged where they happen
        _ => {}
    }
    err.into()
}

// --- Query parameters ---

#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
#[derive(Debug, Deserialize)]
pub struct CollectQuery {
    /// Whole rupees, e.g. `500`
    pub amount: Option<String>,
    pub user_id: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
#[derive(Debug, Deserialize)]
pub struct PayoutQuery {
    /// Whole rupees, e.g. `500`
    pub amount: Option<String>,
    pub user_id: Option<String>,
    /// Beneficiary VPA, e.g. `name@upi`
    pub upi_id: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
#[derive(Debug, Deserialize)]
pub struct CreateContactQuery {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
#[derive(Debug, Deserialize)]
pub struct CreateFundAccountQuery {
    pub contact_id: Option<String>,
    pub upi_id: Option<String>,
}

// --- Responses ---

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize, Deserialize)]
pub struct UserCreatedResponse {
    pub user_id: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize, Deserialize)]
pub struct ContactCreatedResponse {
    pub contact_id: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize, Deserialize)]
pub struct FundAccountCreatedResponse {
    pub fund_account_id: String,
}

// --- Handlers ---

/// Generates a fresh user id. Nothing is stored.
pub async fn create_user_handler() -> Json<UserCreatedResponse> {
    let user_id = Uuid::new_v4().to_string();
    info!(%user_id, "Generated user id");
    Json(UserCreatedResponse { user_id })
}

/// Creates a RazorpayX contact from the query parameters.
pub async fn create_contact_handler(
    State(state): State<Arc<RazorpayState>>,
    query: Result<Query<CreateContactQuery>, QueryRejection>,
) -> Result<Json<ContactCreatedResponse>, Response> {
    let result: Result<ContactCreatedResponse, RazorpayError> = async {
        let session = state.session()?;
        let query = query_params(query)?;
        let contact = ContactDetails {
            name: required(query.name.as_deref())?.to_string(),
            email: required(query.email.as_deref())?.to_string(),
            phone: required(query.phone.as_deref())?.to_string(),
        };
        let contact_id = session.create_contact(&contact).await?;
        Ok(ContactCreatedResponse { contact_id })
    }
    .await;

    map_json_error(result, to_api_error)
}

/// Creates a UPI fund account for an existing contact.
pub async fn create_fund_account_handler(
    State(state): State<Arc<RazorpayState>>,
    query: Result<Query<CreateFundAccountQuery>, QueryRejection>,
) -> Result<Json<FundAccountCreatedResponse>, Response> {
    let result: Result<FundAccountCreatedResponse, RazorpayError> = async {
        let session = state.session()?;
        let query = query_params(query)?;
        let contact_id = required(query.contact_id.as_deref())?;
        let upi_id = required(query.upi_id.as_deref())?;
        let fund_account_id = session.create_fund_account(contact_id, upi_id).await?;
        Ok(FundAccountCreatedResponse { fund_account_id })
    }
    .await;

    map_json_error(result, to_api_error)
}

/// Starts a UPI collection (top-up) and relays the gateway's response.
pub async fn upi_collect_handler(
    State(state): State<Arc<RazorpayState>>,
    query: Result<Query<CollectQuery>, QueryRejection>,
) -> Result<Json<Value>, Response> {
    let result: Result<Value, RazorpayError> = async {
        let session = state.session()?;
        let query = query_params(query)?;
        session
            .collect(
                query.amount.as_deref().unwrap_or_default(),
                query.user_id.as_deref().unwrap_or_default(),
            )
            .await
    }
    .await;

    map_json_error(result, to_api_error)
}

/// Pays out to a UPI address and relays the payout response.
pub async fn upi_payout_handler(
    State(state): State<Arc<RazorpayState>>,
    query: Result<Query<PayoutQuery>, QueryRejection>,
) -> Result<Json<Value>, Response> {
    let result: Result<Value, RazorpayError> = async {
        let session = state.session()?;
        let query = query_params(query)?;
        let request = PayoutRequest {
            amount_major_units: query.amount.as_deref(),
            user_id: query.user_id.as_deref(),
            upi_id: query.upi_id.as_deref(),
        };
        upi_payout(&session, request).await
    }
    .await;

    map_json_error(result, to_api_error)
}
