// --- File: crates/upipay_razorpay/src/doc.rs ---
#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::handlers::{
    CollectQuery, ContactCreatedResponse, CreateContactQuery, CreateFundAccountQuery,
    FundAccountCreatedResponse, PayoutQuery, UserCreatedResponse,
};

#[utoipa::path(
    post,
    path = "/create/user", // Path relative to /api
    responses(
        (status = 200, description = "New user id", body = UserCreatedResponse,
         example = json!({ "user_id": "5f0c6c1e-3c27-4a59-9a55-1b6f4ad2f3c4" }))
    ),
    tag = "Razorpay"
)]
fn doc_create_user_handler() {}

#[utoipa::path(
    post,
    path = "/create/contact",
    params(CreateContactQuery),
    responses(
        (status = 200, description = "Contact created", body = ContactCreatedResponse,
         example = json!({ "contact_id": "cont_00000000000001" })),
        (status = 400, description = "Missing required parameters",
         example = json!({ "error": "Missing required parameters" })),
        (status = 500, description = "Razorpay call failed",
         example = json!({ "error": "Failed to create contact" })),
        (status = 503, description = "Razorpay service is disabled")
    ),
    tag = "Razorpay"
)]
fn doc_create_contact_handler() {}

#[utoipa::path(
    post,
    path = "/create/fund_account",
    params(CreateFundAccountQuery),
    responses(
        (status = 200, description = "UPI fund account created", body = FundAccountCreatedResponse,
         example = json!({ "fund_account_id": "fa_00000000000001" })),
        (status = 400, description = "Missing required parameters"),
        (status = 500, description = "Razorpay call failed",
         example = json!({ "error": "Failed to create fund account" })),
        (status = 503, description = "Razorpay service is disabled")
    ),
    tag = "Razorpay"
)]
fn doc_create_fund_account_handler() {}

#[utoipa::path(
    method(get, post),
    path = "/upi/collect",
    params(CollectQuery),
    responses(
        (status = 200, description = "Razorpay order or payment link, relayed as received"),
        (status = 400, description = "Missing parameters or invalid amount",
         example = json!({ "error": "Invalid amount format, must be a whole number" })),
        (status = 500, description = "Razorpay call failed",
         example = json!({ "error": "Failed to initiate UPI Collect request" })),
        (status = 503, description = "Razorpay service is disabled"),
        (status = 504, description = "Request deadline exceeded")
    ),
    tag = "Razorpay"
)]
fn doc_upi_collect_handler() {}

#[utoipa::path(
    method(get, post),
    path = "/upi/payout",
    params(PayoutQuery),
    responses(
        (status = 200, description = "RazorpayX payout, relayed as received",
         example = json!({ "id": "pout_00000000000001", "status": "processed", "amount": 50000 })),
        (status = 400, description = "Missing parameters or invalid amount"),
        (status = 500, description = "A payout step failed or the source account is not configured",
         example = json!({ "error": "Failed to retrieve Fund Account ID" })),
        (status = 503, description = "Razorpay service is disabled"),
        (status = 504, description = "Request deadline exceeded")
    ),
    tag = "Razorpay"
)]
fn doc_upi_payout_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_create_user_handler,
        doc_create_contact_handler,
        doc_create_fund_account_handler,
        doc_upi_collect_handler,
        doc_upi_payout_handler
    ),
    components(
        schemas(
            UserCreatedResponse,
            ContactCreatedResponse,
            FundAccountCreatedResponse,
            CollectQuery,
            PayoutQuery,
            CreateContactQuery,
            CreateFundAccountQuery
        )
    ),
    tags(
        (name = "Razorpay", description = "UPI collect and RazorpayX payout API")
    )
)]
pub struct RazorpayApiDoc;
