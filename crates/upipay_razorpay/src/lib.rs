// --- File: crates/upipay_razorpay/src/lib.rs ---

pub mod amount;
pub mod client;
pub mod doc;
pub mod error;
pub mod handlers;
pub mod logic;
#[cfg(test)]
mod logic_test;
pub mod payout;
pub mod routes;

// Re-export for main backend
pub use client::{GatewayClient, GatewayEndpoint, GatewayError, RazorpayClient};
pub use error::RazorpayError;
pub use handlers::RazorpayState;
pub use routes::routes;
