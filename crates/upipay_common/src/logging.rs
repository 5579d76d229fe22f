//! Tracing setup for the payment proxy.
//!
//! Every crate logs through `tracing`; the binary calls [`init`] once at
//! startup. `RUST_LOG` directives are honoured on top of the level passed in.

use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Target prefix shared by all of the proxy's crates.
const CRATE_TARGET_PREFIX: &str = "upipay";

/// Installs the global subscriber at INFO for the proxy's own crates.
pub fn init() {
    init_with_level(Level::INFO);
}

/// Installs the global subscriber with `level` for the proxy's own crates.
///
/// Uses `try_init`, so a second call (tests, embedding) is a no-op.
pub fn init_with_level(level: Level) {
    let installed = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .with(filter_for(level, EnvFilter::from_default_env()))
        .try_init()
        .is_ok();

    if installed {
        info!(%level, "Logging initialized");
    }
}

/// Adds the crate-level directive to an existing filter.
///
/// Prefix match, so `upipay_razorpay` and `upipay_backend` are both covered.
fn filter_for(level: Level, base: EnvFilter) -> EnvFilter {
    match format!("{}={}", CRATE_TARGET_PREFIX, level).parse() {
        Ok(directive) => base.add_directive(directive),
        Err(_) => base,
    }
}

/// Logs the outcome of a fallible startup step and hands the result back.
pub fn log_result<T, E: std::fmt::Display>(
    result: Result<T, E>,
    success_message: &str,
    error_context: &str,
) -> Result<T, E> {
    match &result {
        Ok(_) => info!("{}", success_message),
        Err(e) => error!(error = %e, "{}", error_context),
    }
    result
}
