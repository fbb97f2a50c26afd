//! Error types for the deployment client.

use reqwest::StatusCode;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised by the deployment client.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum DeploymentError {
    /// Raised when the provider configuration is incomplete.
    #[error("configuration error: {0}")]
    Config(String),
    /// Raised when the caller's deployment configuration is not a JSON object
    /// or carries an invalid orchestration flag. Nothing is sent.
    #[error("invalid deployment configuration: {message}")]
    InvalidConfig {
        /// Parser or validation message.
        message: String,
    },
    /// Network, DNS, or TLS failure reported by the HTTP client.
    #[error("transport error during {operation}: {message}")]
    Transport {
        /// Lifecycle operation being performed.
        operation: &'static str,
        /// Message returned by the HTTP client.
        message: String,
    },
    /// Raised when the caller-supplied deadline passes before a response.
    #[error("deadline exceeded during {operation}")]
    DeadlineExceeded {
        /// Lifecycle operation being performed.
        operation: &'static str,
    },
    /// Raised when the API answers with a non-success status.
    #[error("{operation} failed with HTTP {status}: {body}")]
    Api {
        /// Lifecycle operation being performed.
        operation: &'static str,
        /// Status returned by the API.
        status: StatusCode,
        /// Response body, verbatim.
        body: String,
    },
    /// Raised when update or shutdown targets an unknown deployment.
    #[error("deployment {deployment_id} not found")]
    NotFound {
        /// Identifier that was not found.
        deployment_id: String,
    },
    /// Raised when a successful create response carries no usable `id`. The
    /// deployment may exist on the backend without a recorded identifier.
    #[error(
        "create response did not contain a string `id`; the deployment may exist untracked and need manual shutdown (response: {body})"
    )]
    MissingDeploymentId {
        /// Response body, verbatim.
        body: String,
    },
    /// Raised when a response body is not the JSON the client expects.
    #[error("malformed {operation} response: {message}")]
    MalformedResponse {
        /// Lifecycle operation being performed.
        operation: &'static str,
        /// Parser error message.
        message: String,
    },
    /// Raised when waiting for shutdown exceeds the timeout.
    #[error("timeout waiting for {action} on deployment {deployment_id}")]
    Timeout {
        /// Action being waited on.
        action: String,
        /// Deployment identifier.
        deployment_id: String,
    },
}

impl From<ConfigError> for DeploymentError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value.to_string())
    }
}
