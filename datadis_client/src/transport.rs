//! HTTP transport abstraction.
//!
//! [`DatadisClient`](crate::DatadisClient) talks to the service only through the
//! [`Transport`] trait, so the exchange can be swapped out (e.g. for a
//! recording fake in tests). [`ReqwestTransport`] is the production
//! implementation: base URL, request timeout and an optional [`RetryPolicy`].
//!
//! Like most HTTP client libraries, a transport reports any non-2xx answer as
//! a [`TransportError`] carrying the status and raw body.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use indexmap::IndexMap;
use reqwest::Client;
pub use reqwest::Method;
use serde_json::Value;
use snafu::ResultExt;
use tracing::debug;

use crate::errors::{ClientBuildSnafu, ClientInitError, empty_body};
use crate::retry::{RetryPolicy, retry_with_policy};

/// Header names whose values are never printed.
const SENSITIVE_HEADERS: [&str; 1] = ["authorization"];

/// A single request, relative to the transport's base URL.
#[derive(Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub path: String,
    pub query: IndexMap<String, String>,
    /// `application/x-www-form-urlencoded` body, if any.
    pub form: Option<IndexMap<String, String>>,
    pub headers: IndexMap<String, String>,
}

impl HttpRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post_form(path: impl Into<String>, form: IndexMap<String, String>) -> Self {
        Self {
            form: Some(form),
            ..Self::new(Method::POST, path)
        }
    }

    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: IndexMap::new(),
            form: None,
            headers: IndexMap::new(),
        }
    }

    pub fn with_query(mut self, query: IndexMap<String, String>) -> Self {
        self.query = query;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

// Credentials travel in the form body and the Authorization header; keep them
// out of any Debug output.
impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: IndexMap<&str, &str> = self
            .headers
            .iter()
            .map(|(k, v)| {
                let redacted = SENSITIVE_HEADERS
                    .iter()
                    .any(|s| k.eq_ignore_ascii_case(s));
                (k.as_str(), if redacted { "[REDACTED]" } else { v.as_str() })
            })
            .collect();
        let form_fields = self
            .form
            .as_ref()
            .map(|form| form.keys().map(String::as_str).collect::<Vec<_>>());

        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("form_fields", &form_fields)
            .field("headers", &headers)
            .finish()
    }
}

/// A successful (2xx) answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }
}

/// A failed exchange.
///
/// `status` is `Some` when the service answered (with a non-2xx status) and
/// `None` for failures before any response (connect, timeout, broken body).
#[derive(Debug, Clone, PartialEq)]
pub struct TransportError {
    message: String,
    status: Option<u16>,
    body: Option<Value>,
}

impl TransportError {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            body: None,
        }
    }

    pub fn with_status(status: u16, message: impl Into<String>, body: Value) -> Self {
        Self {
            message: message.into(),
            status: Some(status),
            body: Some(body),
        }
    }

    /// Builds the error for a non-2xx answer, keeping the raw body.
    pub fn from_response(status: u16, body: &str) -> Self {
        Self::with_status(
            status,
            format!("Request failed with status code {status}"),
            parse_body(body),
        )
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// `(message, status or 0, body or {})`.
    pub(crate) fn into_parts(self) -> (String, u16, Value) {
        (
            self.message,
            self.status.unwrap_or(0),
            self.body.unwrap_or_else(empty_body),
        )
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} ({status})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network(format!("request timed out: {err}"))
        } else {
            Self::network(err.to_string())
        }
    }
}

/// Parses an error body as JSON, falling back to a JSON string. An empty
/// body becomes an empty object.
pub(crate) fn parse_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return empty_body();
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

/// Performs one HTTP exchange.
///
/// Implementations must return non-2xx answers as a [`TransportError`] with
/// the status set, and must not panic on malformed responses.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// [`Transport`] backed by `reqwest`.
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
    retry: Option<RetryPolicy>,
}

impl ReqwestTransport {
    /// Creates a transport for `base_url` whose requests are abandoned after
    /// `timeout`. With a `retry` policy, failed exchanges are retried as the
    /// policy dictates.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        retry: Option<RetryPolicy>,
    ) -> Result<Self, ClientInitError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context(ClientBuildSnafu)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send_once(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .query(&request.query);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(form) = &request.form {
            builder = builder.form(form);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        debug!(
            method = %request.method,
            path = %request.path,
            status = status.as_u16(),
            bytes = body.len(),
            "Datadis response"
        );

        if !status.is_success() {
            return Err(TransportError::from_response(status.as_u16(), &body));
        }

        Ok(HttpResponse {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        retry_with_policy(self.retry.as_ref(), &request.path, || {
            self.send_once(&request)
        })
        .await
    }
}
