//! Settings loading from finance.toml
//!
//! Every field has a default, so an absent file or a file with only a few keys is fine. The
//! backend URL and session path can additionally be overridden from the environment; see
//! [`super::environment`].

use crate::core::aggregate::BudgetThresholds;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default settings file looked up by [`load_default_settings`].
pub const DEFAULT_SETTINGS_FILE: &str = "finance.toml";

/// Default backend base URL.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api";

/// Structure of the whole finance.toml file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Backend connection
    pub api: ApiSettings,
    /// Dashboard policy constants
    pub aggregation: AggregationSettings,
    /// Where the login session is kept between runs
    pub session: SessionSettings,
}

/// `[api]` table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL every endpoint path is appended to
    pub base_url: String,
    /// Bound on each request and on a whole `fetch_all`; `None` waits indefinitely
    pub timeout_secs: Option<u64>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: Some(30),
        }
    }
}

impl ApiSettings {
    /// Request bound as a [`Duration`], `None` when unbounded.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// `[aggregation]` table
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AggregationSettings {
    /// Near-limit / over-budget percentages
    #[serde(flatten)]
    pub thresholds: BudgetThresholds,
    /// `spent / limit` ratio above which a budget needs attention
    pub attention_threshold: f64,
    /// How many attention items to show
    pub attention_top_n: usize,
    /// Months shown in the trend chart
    pub trend_months: usize,
}

impl Default for AggregationSettings {
    fn default() -> Self {
        Self {
            thresholds: BudgetThresholds::default(),
            attention_threshold: 0.8,
            attention_top_n: 3,
            trend_months: 6,
        }
    }
}

/// `[session]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Session file; `None` keeps the session in memory only
    pub path: Option<PathBuf>,
}

/// Loads settings from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A field has the wrong type
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path_ref = path.as_ref();
    tracing::debug!("Loading settings from {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read settings file {}: {e}", path_ref.display()),
    })?;

    parse_settings(&contents)
}

/// Parses settings from TOML text.
pub fn parse_settings(contents: &str) -> Result<Settings> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {DEFAULT_SETTINGS_FILE}: {e}"),
    })
}

/// Loads settings from ./finance.toml, or returns the defaults when the file does not exist.
pub fn load_default_settings() -> Result<Settings> {
    let path = Path::new(DEFAULT_SETTINGS_FILE);
    if path.exists() {
        load_settings(path)
    } else {
        tracing::info!("No {} found, using default settings", DEFAULT_SETTINGS_FILE);
        Ok(Settings::default())
    }
}
