// --- File: crates/upipay_common/src/http.rs ---
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::{HttpStatusCode, UpiPayError};

pub mod client;

impl UpiPayError {
    /// The message shown to API callers, without the category prefix.
    pub fn public_message(&self) -> String {
        match self {
            UpiPayError::InvalidInput(msg)
            | UpiPayError::ConfigError(msg)
            | UpiPayError::Unavailable(msg)
            | UpiPayError::DeadlineExceeded(msg)
            | UpiPayError::InternalError(msg) => msg.clone(),
            UpiPayError::Upstream { message, .. } => message.clone(),
        }
    }
}

/// Extension trait for UpiPayError to convert it to an Axum HTTP response.
pub trait IntoHttpResponse {
    /// Converts the error into an Axum HTTP response.
    fn into_http_response(self) -> Response;
}

impl IntoHttpResponse for UpiPayError {
    fn into_http_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Every error leaves the service as {"error": "<message>"}
        let body = Json(json!({ "error": self.public_message() }));

        (status_code, body).into_response()
    }
}

impl IntoResponse for UpiPayError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}

/// Converts a domain result into a JSON handler result using a custom error mapper.
pub fn map_json_error<T, E, F>(result: Result<T, E>, f: F) -> Result<Json<T>, Response>
where
    T: serde::Serialize,
    F: FnOnce(E) -> UpiPayError,
{
    result.map(Json).map_err(|err| f(err).into_response())
}
