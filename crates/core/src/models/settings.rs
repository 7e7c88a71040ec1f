use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Environment variable overriding [`Settings::base_url`].
pub const BASE_URL_ENV: &str = "EXPENSE_TRACKER_API_URL";

/// Environment variable overriding [`Settings::request_timeout_secs`].
pub const TIMEOUT_ENV: &str = "EXPENSE_TRACKER_TIMEOUT_SECS";

/// Local development backend.
pub const DEFAULT_BASE_URL: &str = "http://localhost:10000";

/// Client configuration. Nothing here is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Backend root, without a trailing slash (e.g. "http://localhost:10000").
    pub base_url: String,

    /// Length of the rolling chart window, in months.
    pub chart_months: u32,

    /// Per-request timeout. Zero disables it.
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            chart_months: 10,
            request_timeout_secs: 30,
        }
    }
}

impl Settings {
    /// Defaults, overridden by `EXPENSE_TRACKER_API_URL` and
    /// `EXPENSE_TRACKER_TIMEOUT_SECS` when set.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Settings::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(url) = lookup(BASE_URL_ENV) {
            settings = settings.with_base_url(url)?;
        }

        if let Some(raw) = lookup(TIMEOUT_ENV) {
            settings.request_timeout_secs = raw.trim().parse().map_err(|_| {
                CoreError::Configuration(format!(
                    "{TIMEOUT_ENV} must be a whole number of seconds, got '{raw}'"
                ))
            })?;
        }

        Ok(settings)
    }

    /// Replace the base URL after validating it.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Result<Self, CoreError> {
        self.base_url = normalize_base_url(&url.into())?;
        Ok(self)
    }
}

/// Trim whitespace and trailing slashes, and require an http(s) URL.
fn normalize_base_url(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = reqwest::Url::parse(trimmed)
        .map_err(|e| CoreError::Configuration(format!("Invalid base URL '{raw}': {e}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => Err(CoreError::Configuration(format!(
            "Base URL '{raw}' must use http or https, not '{other}'"
        ))),
    }
}
