use serde_json::{Map, Value};
use snafu::{Backtrace, Snafu};
use thiserror::Error;

use shared_utils::env::{InvalidEnvVarError, MissingEnvVarError};

use crate::transport::TransportError;

/// The unified error type returned by every [`DatadisClient`](crate::DatadisClient) operation.
///
/// `status` is the upstream HTTP status, or `0` when the failure happened
/// before any response was received. `body` is the raw upstream error body:
/// parsed JSON when possible, a JSON string otherwise, and an empty object
/// when there was no body at all.
#[derive(Debug, Error)]
pub enum DatadisError {
    /// The caller supplied insufficient or invalid identifying parameters.
    /// Raised locally, before any request is sent.
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// The login exchange failed.
    #[error("Authentication failed ({status}): {message}")]
    Auth {
        message: String,
        status: u16,
        body: Value,
    },

    /// A data request reached the service and it answered with an error.
    #[error("API error ({status}): {message}")]
    Api {
        message: String,
        status: u16,
        body: Value,
    },

    /// Any other failure during a data request (network, timeout, bad payload,
    /// missing session).
    #[error("Client error: {message}")]
    Client {
        message: String,
        status: u16,
        body: Value,
    },
}

/// Discriminant of [`DatadisError`], handy for matching in tests and callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Auth,
    Api,
    Client,
}

impl DatadisError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub(crate) fn client(message: impl Into<String>) -> Self {
        Self::Client {
            message: message.into(),
            status: 0,
            body: empty_body(),
        }
    }

    /// Classifies a failed login exchange. Every failure is an auth failure.
    pub(crate) fn from_login_failure(err: TransportError) -> Self {
        let (message, status, body) = err.into_parts();
        Self::Auth {
            message,
            status,
            body,
        }
    }

    /// Classifies a failed data request: anything the service actually
    /// answered is an API error, everything else is a client error.
    pub(crate) fn from_request_failure(err: TransportError) -> Self {
        let responded = err.status().is_some();
        let (message, status, body) = err.into_parts();
        if responded {
            Self::Api {
                message,
                status,
                body,
            }
        } else {
            Self::Client {
                message,
                status,
                body,
            }
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Auth { .. } => ErrorKind::Auth,
            Self::Api { .. } => ErrorKind::Api,
            Self::Client { .. } => ErrorKind::Client,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Validation { message }
            | Self::Auth { message, .. }
            | Self::Api { message, .. }
            | Self::Client { message, .. } => message,
        }
    }

    /// Upstream status code, `0` if unavailable.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 0,
            Self::Auth { status, .. } | Self::Api { status, .. } | Self::Client { status, .. } => {
                *status
            }
        }
    }

    /// Raw upstream error body, an empty object if unavailable.
    pub fn body(&self) -> Value {
        match self {
            Self::Validation { .. } => empty_body(),
            Self::Auth { body, .. } | Self::Api { body, .. } | Self::Client { body, .. } => {
                body.clone()
            }
        }
    }
}

pub(crate) fn empty_body() -> Value {
    Value::Object(Map::new())
}

/// Errors that can occur while building a [`DatadisClient`](crate::DatadisClient)
/// or loading its configuration.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ClientInitError {
    /// missed environment variable.
    #[snafu(display("Missing environment variable: {source}"))]
    MissingEnvVar {
        source: MissingEnvVarError,
        backtrace: Backtrace,
    },

    /// environment variable set to something unparsable.
    #[snafu(display("{source}"))]
    InvalidEnvVar {
        source: InvalidEnvVarError,
        backtrace: Backtrace,
    },

    #[snafu(display("Failed to read config file {path}: {source}"))]
    ConfigRead {
        path: String,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("Failed to parse config: {source}"))]
    ConfigParse {
        source: toml::de::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("Invalid configuration: {message}"))]
    InvalidConfig {
        message: String,
        backtrace: Backtrace,
    },

    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },
}
