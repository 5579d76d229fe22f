// --- File: crates/upipay_common/src/http/client.rs ---
use reqwest::{redirect::Policy, Client, Error as ReqwestError};
use std::time::Duration;

/// Sent with every outbound request.
pub const USER_AGENT: &str = concat!("upipay/", env!("CARGO_PKG_VERSION"));

/// Upper bound on establishing a connection, whatever the overall timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Creates the HTTP client used for outbound API calls.
///
/// `timeout` bounds a whole request. Redirects are only followed when asked
/// for; API gateways answering with a redirect are treated as an answer.
pub fn create_client(timeout: Duration, follow_redirects: bool) -> Result<Client, ReqwestError> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .redirect(if follow_redirects {
            Policy::default()
        } else {
            Policy::none()
        })
        .build()
}
