// --- File: crates/upipay_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The error every HTTP-facing crate of the payment proxy converts into.
///
/// Feature crates keep their own error enums and implement
/// `From<TheirError> for UpiPayError`; the variant picks the HTTP status and
/// the payload is the message shown to the caller.
#[derive(Error, Debug)]
pub enum UpiPayError {
    /// The caller sent missing or malformed parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The service is missing configuration it needs for this request
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A payment gateway call failed or answered with something unusable
    #[error("{service} error: {message}")]
    Upstream { service: String, message: String },

    /// The feature behind the route is switched off
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// The request ran out of time before its work was done
    #[error("Deadline exceeded: {0}")]
    DeadlineExceeded(String),

    /// Anything else, typically startup failures
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for UpiPayError {
    fn status_code(&self) -> u16 {
        match self {
            UpiPayError::InvalidInput(_) => 400,
            UpiPayError::ConfigError(_) => 500,
            UpiPayError::Upstream { .. } => 500,
            UpiPayError::Unavailable(_) => 503,
            UpiPayError::DeadlineExceeded(_) => 504,
            UpiPayError::InternalError(_) => 500,
        }
    }
}

/// Attaches a description of what was being attempted to a foreign error.
pub trait Context<T, E> {
    fn context<C>(self, context: C) -> Result<T, UpiPayError>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Like [`Context::context`], building the description only on failure.
    fn with_context<C, F>(self, f: F) -> Result<T, UpiPayError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E: std::error::Error + Send + Sync + 'static> Context<T, E> for Result<T, E> {
    fn context<C>(self, context: C) -> Result<T, UpiPayError>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.with_context(|| context)
    }

    fn with_context<C, F>(self, f: F) -> Result<T, UpiPayError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|error| internal_error(format!("{}: {}", f(), error)))
    }
}

pub fn invalid_input<T: fmt::Display>(message: T) -> UpiPayError {
    UpiPayError::InvalidInput(message.to_string())
}

pub fn config_error<T: fmt::Display>(message: T) -> UpiPayError {
    UpiPayError::ConfigError(message.to_string())
}

pub fn upstream_error<T: fmt::Display>(service: &str, message: T) -> UpiPayError {
    UpiPayError::Upstream {
        service: service.to_string(),
        message: message.to_string(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> UpiPayError {
    UpiPayError::InternalError(message.to_string())
}
