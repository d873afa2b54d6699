use std::collections::HashMap;
use thiserror::Error;

use crate::api::ErrorBody;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Input failed local checks; nothing was sent
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        field_errors: HashMap<String, String>,
    },

    #[error("Server rejected request ({status}): {message}")]
    ServerRejection {
        status: u16,
        message: String,
        field_errors: Option<HashMap<String, String>>,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Authentication expired or invalid")]
    AuthExpiry,

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid server URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ClientError {
    /// Classify a non-2xx response
    pub fn from_status(status: u16, body: ErrorBody) -> Self {
        let message = if body.message.is_empty() {
            format!("HTTP {}", status)
        } else {
            body.message
        };
        match status {
            401 => ClientError::AuthExpiry,
            404 => ClientError::NotFound(message),
            _ => ClientError::ServerRejection {
                status,
                message,
                field_errors: body.field_errors,
            },
        }
    }

    /// Per-field messages to map back onto a form, if the error carries any
    pub fn field_errors(&self) -> Option<&HashMap<String, String>> {
        match self {
            ClientError::Validation { field_errors, .. } => Some(field_errors),
            ClientError::ServerRejection { field_errors, .. } => field_errors.as_ref(),
            _ => None,
        }
    }

    pub fn is_auth_expiry(&self) -> bool {
        matches!(self, ClientError::AuthExpiry)
    }
}
