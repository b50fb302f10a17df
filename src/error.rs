//! Error types for Elidune Desk

use reqwest::StatusCode;
use thiserror::Error;

/// Main desk error type
#[derive(Error, Debug)]
pub enum DeskError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server responded with {status}: {body}")]
    HttpStatus { status: StatusCode, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("{0}")]
    ServerReported(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl DeskError {
    /// Failures worth retrying by hand: the network, or the server being down.
    pub fn is_transient(&self) -> bool {
        match self {
            DeskError::Network(_) => true,
            DeskError::HttpStatus { status, .. } => status.is_server_error(),
            _ => false,
        }
    }

    /// Text shown to the user in an alert
    pub fn user_message(&self) -> String {
        match self {
            DeskError::ServerReported(msg) | DeskError::Validation(msg) => msg.clone(),
            DeskError::Network(_) => {
                "Could not reach the library server, please try again".to_string()
            }
            DeskError::HttpStatus { status, .. } if status.is_server_error() => {
                format!("The library server failed ({}), please try again", status)
            }
            DeskError::HttpStatus { status, .. } => {
                format!("The request was refused ({})", status)
            }
            DeskError::MalformedResponse(_) => {
                "The library server sent an unexpected response".to_string()
            }
            DeskError::InvalidState(msg) => msg.clone(),
            DeskError::Config(e) => format!("Configuration error: {}", e),
        }
    }
}

impl From<validator::ValidationErrors> for DeskError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let message = fields
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("Invalid value for {}", field),
                })
            })
            .next()
            .unwrap_or_else(|| "Invalid form".to_string());

        DeskError::Validation(message)
    }
}

/// Result type alias for desk operations
pub type DeskResult<T> = Result<T, DeskError>;
