// --- File: crates/upipay_razorpay/src/payout.rs ---
//! UPI payouts: contact, then fund account, then payout.
//!
//! Each step consumes the id produced by the one before it, so the steps run
//! strictly in sequence. Nothing is retried and nothing created upstream is
//! rolled back when a later step fails; the orphaned ids are logged instead.

use serde_json::{json, Value};
use tracing::{info, warn};

use crate::amount::normalize;
use crate::client::GatewayEndpoint;
use crate::error::RazorpayError;
use crate::logic::{extract_id, required, ContactDetails, GatewaySession};

/// Id returned for payouts that never reach the gateway in sandbox mode.
pub const SANDBOX_PAYOUT_ID: &str = "pout_TEST123456";

/// Query parameters of a payout, as received.
#[derive(Debug, Clone, Copy)]
pub struct PayoutRequest<'r> {
    pub amount_major_units: Option<&'r str>,
    pub user_id: Option<&'r str>,
    pub upi_id: Option<&'r str>,
}

/// Progress of one payout. An `Err` out of [`PayoutStage::advance`] is the
/// terminal failure state.
#[derive(Debug, Clone, PartialEq)]
pub enum PayoutStage {
    Start,
    ContactCreated {
        contact_id: String,
    },
    FundAccountCreated {
        contact_id: String,
        fund_account_id: String,
    },
    PayoutCreated(Value),
}

/// Validated payout inputs.
struct PayoutOrder<'r> {
    amount: i64,
    user_id: &'r str,
    upi_id: &'r str,
    /// `None` only in sandbox mode.
    account_number: Option<&'r str>,
}

impl PayoutStage {
    async fn advance(
        self,
        session: &GatewaySession<'_>,
        order: &PayoutOrder<'_>,
    ) -> Result<PayoutStage, RazorpayError> {
        match self {
            PayoutStage::Start => {
                let contact = ContactDetails::placeholder_for(order.user_id);
                let contact_id = session.create_contact(&contact).await?;
                Ok(PayoutStage::ContactCreated { contact_id })
            }
            PayoutStage::ContactCreated { contact_id } => {
                match session.create_fund_account(&contact_id, order.upi_id).await {
                    Ok(fund_account_id) => Ok(PayoutStage::FundAccountCreated {
                        contact_id,
                        fund_account_id,
                    }),
                    Err(e) => {
                        warn!(%contact_id, user_id = %order.user_id, "Payout aborted, contact left behind");
                        Err(e)
                    }
                }
            }
            PayoutStage::FundAccountCreated {
                contact_id,
                fund_account_id,
            } => match create_payout(session, order, &fund_account_id).await {
                Ok(response) => Ok(PayoutStage::PayoutCreated(response)),
                Err(e) => {
                    warn!(
                        %contact_id,
                        %fund_account_id,
                        user_id = %order.user_id,
                        "Payout aborted, contact and fund account left behind"
                    );
                    Err(e)
                }
            },
            done @ PayoutStage::PayoutCreated(_) => Ok(done),
        }
    }
}

async fn create_payout(
    session: &GatewaySession<'_>,
    order: &PayoutOrder<'_>,
    fund_account_id: &str,
) -> Result<Value, RazorpayError> {
    let config = session.config();

    let Some(account_number) = order.account_number else {
        info!(%fund_account_id, "Sandbox mode, skipping payout call");
        return Ok(sandbox_payout(
            fund_account_id,
            order.amount,
            &config.currency,
        ));
    };

    let payload = json!({
        "account_number": account_number,
        "fund_account_id": fund_account_id,
        "amount": order.amount,
        "currency": config.currency,
        "mode": "UPI",
        "purpose": "refund",
        "queue_if_low_balance": true,
        "notes": { "user_id": order.user_id },
    });

    let response = session
        .send(
            GatewayEndpoint::Payouts,
            payload,
            RazorpayError::PayoutCreationFailed,
        )
        .await?;
    info!(
        %fund_account_id,
        payout_id = ?extract_id(&response),
        status = ?response.get("status"),
        "Payout request answered"
    );
    Ok(response)
}

/// The payout document returned instead of calling `/v1/payouts`.
pub fn sandbox_payout(fund_account_id: &str, amount: i64, currency: &str) -> Value {
    json!({
        "id": SANDBOX_PAYOUT_ID,
        "fund_account_id": fund_account_id,
        "status": "processed",
        "amount": amount,
        "currency": currency,
        "mode": "UPI",
        "purpose": "refund",
    })
}

/// Pays `amount_major_units` out to `upi_id` on behalf of `user_id`.
///
/// Input is validated before the first gateway call. On success the payout
/// step's raw response (or the sandbox placeholder) is returned.
pub async fn upi_payout(
    session: &GatewaySession<'_>,
    request: PayoutRequest<'_>,
) -> Result<Value, RazorpayError> {
    let amount_major_units = required(request.amount_major_units)?;
    let user_id = required(request.user_id)?;
    let upi_id = required(request.upi_id)?;
    let amount = normalize(amount_major_units)?;

    let config = session.config();
    let account_number = if config.sandbox_mode {
        None
    } else {
        Some(config.payout_account().ok_or_else(|| {
            RazorpayError::ConfigError("Payout source account not configured".to_string())
        })?)
    };

    info!(%user_id, amount_minor_units = amount, "UPI payout request");

    let order = PayoutOrder {
        amount,
        user_id,
        upi_id,
        account_number,
    };

    let mut stage = PayoutStage::Start;
    loop {
        stage = stage.advance(session, &order).await?;
        if let PayoutStage::PayoutCreated(response) = stage {
            return Ok(response);
        }
    }
}
