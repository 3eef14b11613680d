use std::str::FromStr;

use thiserror::Error;

/// An environment variable required by the application is not set.
#[derive(Debug, Error)]
#[error("Missing environment variable: {0}")]
pub struct MissingEnvVarError(pub String);

/// An environment variable is set but its value could not be parsed.
#[derive(Debug, Error)]
#[error("Invalid value for environment variable {name}: {value:?}")]
pub struct InvalidEnvVarError {
    pub name: String,
    pub value: String,
}

/// Reads an environment variable, returning a structured error if it's missing.
///
/// Blank values are treated the same as unset ones, since a credential or
/// path consisting only of whitespace is never meaningful.
///
/// # Arguments
/// * `name` - The name of the environment variable to read.
pub fn get_env_var(name: &str) -> Result<String, MissingEnvVarError> {
    get_env_var_opt(name).ok_or_else(|| MissingEnvVarError(name.to_string()))
}

/// Reads an optional environment variable. Unset and blank both yield `None`.
pub fn get_env_var_opt(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

/// Reads and parses an optional environment variable.
///
/// Returns `Ok(None)` when the variable is unset, and an error when it is set
/// to something `T` cannot parse.
pub fn parse_env_var<T: FromStr>(name: &str) -> Result<Option<T>, InvalidEnvVarError> {
    match get_env_var_opt(name) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| InvalidEnvVarError {
            name: name.to_string(),
            value: raw,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VAR: &str = "SHARED_UTILS_ENV_TEST_VAR";

    // Edition 2024 marks env mutation unsafe; the tests are serialized.
    fn set(value: &str) {
        unsafe { std::env::set_var(VAR, value) }
    }

    fn unset() {
        unsafe { std::env::remove_var(VAR) }
    }

    #[test]
    #[serial]
    fn missing_var_reports_its_name() {
        unset();
        let err = get_env_var(VAR).unwrap_err();
        assert_eq!(err.0, VAR);
        assert!(err.to_string().contains(VAR));
    }

    #[test]
    #[serial]
    fn blank_var_counts_as_missing() {
        set("   ");
        assert!(get_env_var(VAR).is_err());
        assert_eq!(get_env_var_opt(VAR), None);
        unset();
    }

    #[test]
    #[serial]
    fn parses_numeric_values() {
        set(" 2500 ");
        assert_eq!(parse_env_var::<u64>(VAR).unwrap(), Some(2500));

        set("soon");
        let err = parse_env_var::<u64>(VAR).unwrap_err();
        assert_eq!(err.value, "soon");

        unset();
        assert_eq!(parse_env_var::<u64>(VAR).unwrap(), None);
    }
}
