//! Geocoder configuration parsed from environment variables.

use super::types::GeocodeError;

pub const DEFAULT_GEOCODER_BASE_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_GEOCODER_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_GEOCODER_CONNECT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeocodeTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for GeocodeTimeouts {
    fn default() -> Self {
        Self {
            request_secs: DEFAULT_GEOCODER_REQUEST_TIMEOUT_SECS,
            connect_secs: DEFAULT_GEOCODER_CONNECT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeouts: GeocodeTimeouts,
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GEOCODER_BASE_URL.to_string(),
            user_agent: default_user_agent(),
            timeouts: GeocodeTimeouts::default(),
        }
    }
}

impl GeocodeConfig {
    /// Build typed geocoder config from environment variables.
    ///
    /// Optional:
    /// - `GEOCODER_BASE_URL`: default `https://nominatim.openstreetmap.org`
    /// - `GEOCODER_USER_AGENT`: default `mapdraw/<version>`
    /// - `GEOCODER_REQUEST_TIMEOUT_SECS`: default 10
    /// - `GEOCODER_CONNECT_TIMEOUT_SECS`: default 5
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::ConfigParse`] if the base URL is not http(s).
    pub fn from_env() -> Result<Self, GeocodeError> {
        let base_url = normalize_base_url(&env_or("GEOCODER_BASE_URL", DEFAULT_GEOCODER_BASE_URL))?;
        let user_agent = env_or("GEOCODER_USER_AGENT", &default_user_agent());
        let timeouts = GeocodeTimeouts {
            request_secs: env_parse_u64("GEOCODER_REQUEST_TIMEOUT_SECS", DEFAULT_GEOCODER_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("GEOCODER_CONNECT_TIMEOUT_SECS", DEFAULT_GEOCODER_CONNECT_TIMEOUT_SECS),
        };
        Ok(Self { base_url, user_agent, timeouts })
    }

    /// Replace the base URL, validating and normalizing it.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::ConfigParse`] if the URL is not http(s).
    pub fn with_base_url(mut self, raw: &str) -> Result<Self, GeocodeError> {
        self.base_url = normalize_base_url(raw)?;
        Ok(self)
    }
}

/// Trim trailing slashes and require an http(s) scheme.
pub(crate) fn normalize_base_url(raw: &str) -> Result<String, GeocodeError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(GeocodeError::ConfigParse(format!("GEOCODER_BASE_URL must be http(s), got '{raw}'")));
    }
    Ok(trimmed.to_string())
}

fn default_user_agent() -> String {
    format!("mapdraw/{}", env!("CARGO_PKG_VERSION"))
}

fn env_or(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => default.to_string(),
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    match std::env::var(key) {
        Ok(v) => v.trim().parse::<u64>().unwrap_or(default),
        Err(_) => default,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
