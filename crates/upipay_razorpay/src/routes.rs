// --- File: crates/upipay_razorpay/src/routes.rs ---

use crate::handlers::{
    create_contact_handler, create_fund_account_handler, create_user_handler,
    upi_collect_handler, upi_payout_handler, RazorpayState,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Creates a router containing all routes for the Razorpay feature.
pub fn routes(state: RazorpayState) -> Router {
    Router::new()
        .route("/create/user", post(create_user_handler))
        .route("/create/contact", post(create_contact_handler))
        .route("/create/fund_account", post(create_fund_account_handler))
        // Collect and payout accept both methods; parameters come from the query string
        .route(
            "/upi/collect",
            get(upi_collect_handler).post(upi_collect_handler),
        )
        .route("/upi/payout", get(upi_payout_handler).post(upi_payout_handler))
        .with_state(Arc::new(state))
}
