use secrecy::SecretString;
use snafu::ResultExt;

use shared_utils::env::{get_env_var, get_env_var_opt};

use crate::errors::{ClientInitError, MissingEnvVarSnafu};

pub const USERNAME_VAR: &str = "DATADIS_USERNAME";
pub const PASSWORD_VAR: &str = "DATADIS_PASSWORD";
pub const NAME_VAR: &str = "DATADIS_NAME";

/// Datadis credentials plus a display name.
///
/// The password is kept in a [`SecretString`], so `Debug` output redacts it.
#[derive(Debug, Clone)]
pub struct Account {
    /// Display name; defaults to the username.
    pub name: String,
    /// Login identifier (the account holder's NIF).
    pub username: String,
    pub password: SecretString,
}

impl Account {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        let username = username.into();
        Self {
            name: username.clone(),
            username,
            password: SecretString::new(password.into().into()),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Reads credentials from `DATADIS_USERNAME` and `DATADIS_PASSWORD`,
    /// and an optional display name from `DATADIS_NAME`.
    pub fn from_env() -> Result<Self, ClientInitError> {
        let username = get_env_var(USERNAME_VAR).context(MissingEnvVarSnafu)?;
        let password = get_env_var(PASSWORD_VAR).context(MissingEnvVarSnafu)?;

        let account = Self::new(username, password);
        Ok(match get_env_var_opt(NAME_VAR) {
            Some(name) => account.with_name(name),
            None => account,
        })
    }
}
