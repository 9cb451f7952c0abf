// src/error.rs
//! Error taxonomy for the verification endpoint.
//!
//! Every variant maps to an HTTP status and a caller-facing message. Upstream
//! details (status, body) stay in the server log and never reach the caller.

use axum::http::StatusCode;
use thiserror::Error;

/// Message returned for failures that carry no usable text of their own.
pub const GENERIC_SERVER_ERROR: &str = "Server error";

/// Errors that can end a verification request.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// Site id or API key is not configured.
    #[error("Backend missing env vars")]
    MissingConfig,

    /// Request used a method other than GET or OPTIONS.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// `name` or `serial` query parameter is absent or empty.
    #[error("Missing name or serial")]
    MissingParams,

    /// Normalized serial does not match the accepted format.
    #[error("Invalid serial format")]
    InvalidSerial,

    /// Collection store answered with a non-success status.
    #[error("Framer CMS fetch failed")]
    Upstream {
        /// HTTP status returned by the store.
        status: u16,
        /// Response body, kept for diagnostics.
        body: String,
    },

    /// Transport failure talking to the collection store.
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// Collection store returned a body that is not valid JSON.
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// Collection store returned JSON of an unexpected shape.
    #[error("Malformed CMS response: {0}")]
    MalformedResponse(String),
}

impl VerifyError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            VerifyError::MissingConfig => StatusCode::INTERNAL_SERVER_ERROR,
            VerifyError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            VerifyError::MissingParams | VerifyError::InvalidSerial => StatusCode::BAD_REQUEST,
            VerifyError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            VerifyError::Http(_) | VerifyError::Json(_) | VerifyError::MalformedResponse(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message placed in the response envelope's `error` field.
    pub fn client_message(&self) -> String {
        let message = self.to_string();
        if message.is_empty() {
            GENERIC_SERVER_ERROR.to_string()
        } else {
            message
        }
    }

    /// True for errors caused by the caller's request rather than the service.
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}
