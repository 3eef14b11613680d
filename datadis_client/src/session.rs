//! Credentials and the bearer token obtained from them.

use indexmap::IndexMap;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};

use crate::endpoints;
use crate::errors::{DatadisError, empty_body};
use crate::models::account::Account;
use crate::transport::{HttpRequest, Transport};

/// The result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub account: Account,
    pub token: SecretString,
}

/// Holds the account and, after [`login`](Self::login), the current token.
///
/// The token is the only state that changes after construction; each login
/// replaces it. `login` takes `&mut self`, so a login can never overlap
/// requests that read the token.
#[derive(Debug)]
pub struct SessionManager {
    account: Account,
    token: Option<SecretString>,
}

impl SessionManager {
    pub fn new(account: Account) -> Self {
        Self {
            account,
            token: None,
        }
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Exchanges the credentials for a bearer token and stores it.
    ///
    /// Any failure (blank credentials, network error, non-2xx answer, empty
    /// token) is reported as [`DatadisError::Auth`]. A failed login leaves
    /// the previous token, if any, in place.
    pub async fn login(&mut self, transport: &dyn Transport) -> Result<LoginOutcome, DatadisError> {
        let username = self.account.username.trim();
        let password = self.account.password.expose_secret();
        if username.is_empty() || password.is_empty() {
            return Err(DatadisError::Auth {
                message: "username and password are mandatory".to_string(),
                status: 0,
                body: empty_body(),
            });
        }

        let mut form = IndexMap::new();
        form.insert("username".to_string(), username.to_string());
        form.insert("password".to_string(), password.to_string());
        let request = HttpRequest::post_form(endpoints::LOGIN, form);

        debug!(account = %self.account.name, "Logging in to Datadis");
        let response = transport
            .send(request)
            .await
            .map_err(DatadisError::from_login_failure)?;

        let token = extract_token(&response.body).ok_or_else(|| DatadisError::Auth {
            message: "login response did not contain a token".to_string(),
            status: response.status,
            body: empty_body(),
        })?;

        let token = SecretString::new(token.into());
        self.token = Some(token.clone());
        info!(account = %self.account.name, "Logged in to Datadis");

        Ok(LoginOutcome {
            account: self.account.clone(),
            token,
        })
    }

    /// Attaches the stored token to `request` as a bearer credential.
    /// Fails with a client error when there has been no successful login.
    pub(crate) fn authorize(&self, request: HttpRequest) -> Result<HttpRequest, DatadisError> {
        let token = self
            .token
            .as_ref()
            .ok_or_else(|| DatadisError::client("not logged in: call login() first"))?;
        Ok(request.with_header("Authorization", format!("Bearer {}", token.expose_secret())))
    }
}

/// The login endpoint answers with the bare token. Some deployments wrap it
/// as a JSON string; accept both.
fn extract_token(body: &str) -> Option<String> {
    let body = body.trim();
    let token = serde_json::from_str::<String>(body).unwrap_or_else(|_| body.to_string());
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}
