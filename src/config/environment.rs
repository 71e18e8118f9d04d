//! Environment overrides.
//!
//! The binary calls `dotenvy::dotenv()` first, so these can also come from a `.env` file.
//! `FINANCE_API_URL` and `FINANCE_SESSION_PATH` override the matching settings;
//! `FINANCE_USERNAME` and `FINANCE_PASSWORD` are only read when no stored session exists.

use super::settings::Settings;
use std::path::PathBuf;

/// Backend base URL override
pub const API_URL_VAR: &str = "FINANCE_API_URL";
/// Session file override
pub const SESSION_PATH_VAR: &str = "FINANCE_SESSION_PATH";
/// Login name for the binary
pub const USERNAME_VAR: &str = "FINANCE_USERNAME";
/// Password for the binary
pub const PASSWORD_VAR: &str = "FINANCE_PASSWORD";

/// Username/password pair read from the environment.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Login name
    pub username: String,
    /// Plain-text password, never logged
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Applies environment overrides, looking variables up through `lookup`.
pub fn apply_overrides_with<F>(settings: &mut Settings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = non_empty(lookup(API_URL_VAR)) {
        tracing::debug!("Backend URL overridden from {}", API_URL_VAR);
        settings.api.base_url = url;
    }
    if let Some(path) = non_empty(lookup(SESSION_PATH_VAR)) {
        settings.session.path = Some(PathBuf::from(path));
    }
}

/// Applies overrides from the process environment.
pub fn apply_overrides(settings: &mut Settings) {
    apply_overrides_with(settings, |key| std::env::var(key).ok());
}

/// Reads credentials through `lookup`. Both variables must be set and non-empty.
pub fn credentials_with<F>(lookup: F) -> Option<Credentials>
where
    F: Fn(&str) -> Option<String>,
{
    match (non_empty(lookup(USERNAME_VAR)), lookup(PASSWORD_VAR)) {
        (Some(username), Some(password)) if !password.is_empty() => {
            Some(Credentials { username, password })
        }
        _ => None,
    }
}

/// Reads credentials from the process environment.
#[must_use]
pub fn credentials() -> Option<Credentials> {
    credentials_with(|key| std::env::var(key).ok())
}
