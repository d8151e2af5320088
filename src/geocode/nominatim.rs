//! Nominatim-compatible reverse geocoding client.
//!
//! Issues `GET {base}/reverse?format=json&lat=..&lon=..` and reads the
//! `display_name` field of the JSON answer. Nominatim reports "nothing here"
//! (open ocean, poles) as a 200 with an `error` field; that is surfaced as a
//! parse failure like any other body without a display name.

use std::time::Duration;

use serde_json::Value;

use super::config::GeocodeConfig;
use super::types::{GeocodeError, PlaceResolver};

pub struct NominatimResolver {
    http: reqwest::Client,
    base_url: String,
}

impl NominatimResolver {
    /// Build a client from typed config.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::HttpClientBuild`] if the HTTP client cannot be constructed.
    pub fn new(config: &GeocodeConfig) -> Result<Self, GeocodeError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| GeocodeError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.clone() })
    }

    /// The lookup URL for one coordinate.
    #[must_use]
    pub fn reverse_url(&self, lon: f64, lat: f64) -> String {
        format!("{}/reverse?format=json&lat={lat}&lon={lon}", self.base_url)
    }
}

#[async_trait::async_trait]
impl PlaceResolver for NominatimResolver {
    async fn resolve(&self, lon: f64, lat: f64) -> Result<String, GeocodeError> {
        let url = self.reverse_url(lon, lat);
        tracing::debug!(%url, "reverse geocoding");
        let response = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| GeocodeError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GeocodeError::Request(e.to_string()))?;
        if !status.is_success() {
            return Err(GeocodeError::Status { status: status.as_u16(), body: text });
        }
        parse_reverse_response(&text)
    }
}

pub(crate) fn parse_reverse_response(json_text: &str) -> Result<String, GeocodeError> {
    let root: Value = serde_json::from_str(json_text).map_err(|e| GeocodeError::Parse(e.to_string()))?;
    if let Some(name) = root.get("display_name").and_then(Value::as_str) {
        return Ok(name.to_string());
    }
    match root.get("error") {
        Some(Value::String(message)) => Err(GeocodeError::Parse(format!("geocoder error: {message}"))),
        Some(Value::Object(obj)) => {
            let message = obj.get("message").and_then(Value::as_str).unwrap_or("unknown");
            Err(GeocodeError::Parse(format!("geocoder error: {message}")))
        }
        _ => Err(GeocodeError::Parse("missing display_name".to_string())),
    }
}

#[cfg(test)]
#[path = "nominatim_test.rs"]
mod tests;
