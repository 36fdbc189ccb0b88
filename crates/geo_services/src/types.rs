/// A successfully geocoded address.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedLocation {
    /// Latitude of the best match
    pub latitude: f64,
    /// Longitude of the best match
    pub longitude: f64,
    /// Canonical address string for the best match
    pub formatted_address: String,
}

/// Configuration for the geocoding client.
///
/// Built explicitly and handed to the client constructor; the only ambient
/// lookup is the optional `from_env` convenience used at startup.
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    /// API key for the geocoding provider
    pub api_key: String,
    /// Base URL of the geocoding endpoint
    pub base_url: String,
}

impl GeocoderConfig {
    /// Loads the configuration from `GEOCODER_API_KEY` and, optionally,
    /// `GEOCODER_BASE_URL`.
    pub fn from_env() -> Result<Self, GeocodeError> {
        let api_key = std::env::var("GEOCODER_API_KEY")
            .map_err(|_| GeocodeError::Config("GEOCODER_API_KEY is not set".to_string()))?;
        let base_url = std::env::var("GEOCODER_BASE_URL")
            .unwrap_or_else(|_| "https://maps.googleapis.com/maps/api/geocode/json".to_string());

        Ok(Self { api_key, base_url })
    }
}

/// Custom error type for geocoding operations
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    /// The provider returned no usable result for the address
    #[error("No results for the given address")]
    ZeroResults,

    /// The provider answered with a non-success status
    #[error("Geocoder API error: {0}")]
    Api(String),

    /// The HTTP request itself failed
    #[error("Geocoder request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The client configuration is incomplete
    #[error("Geocoder configuration error: {0}")]
    Config(String),
}
