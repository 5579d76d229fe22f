// --- File: crates/upipay_common/src/lib.rs ---

pub mod error; // Error handling
pub mod http; // HTTP utilities
pub mod logging; // Logging utilities

pub use error::{
    config_error, internal_error, invalid_input, upstream_error, Context, HttpStatusCode,
    UpiPayError,
};

pub use http::{client::create_client, map_json_error, IntoHttpResponse};

pub use logging::{init, init_with_level, log_result};
