//! Place resolver seam and its errors.

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by reverse-geocoding operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeocodeError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request never produced a response (connect error, timeout, etc.).
    #[error("geocoding request failed: {0}")]
    Request(String),

    /// The geocoding service returned a non-success HTTP status.
    #[error("geocoding response error: status {status}")]
    Status { status: u16, body: String },

    /// The response body was not JSON or had no `display_name` string.
    #[error("geocoding response parse failed: {0}")]
    Parse(String),
}

impl GeocodeError {
    /// Short machine-readable code for logs.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigParse(_) => "E_CONFIG_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::Request(_) => "E_GEOCODE_REQUEST",
            Self::Status { .. } => "E_GEOCODE_STATUS",
            Self::Parse(_) => "E_GEOCODE_PARSE",
        }
    }
}

// =============================================================================
// PLACE RESOLVER TRAIT
// =============================================================================

/// Reverse geocoder: coordinate in, display name out. Enables mocking in tests.
#[async_trait::async_trait]
pub trait PlaceResolver: Send + Sync {
    /// Look up a human-readable place name for a coordinate in degrees.
    ///
    /// One best-effort attempt; no retry.
    ///
    /// # Errors
    ///
    /// Returns a [`GeocodeError`] if the request fails, the service answers
    /// with a non-success status, or the response has no display name.
    async fn resolve(&self, lon: f64, lat: f64) -> Result<String, GeocodeError>;
}
