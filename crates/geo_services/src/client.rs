use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::types::{GeocodeError, GeocodedLocation, GeocoderConfig};

/// Translates a free-text address into coordinates plus a canonical address.
#[async_trait::async_trait]
pub trait Geocoder: Send + Sync {
    /// Geocodes the given address, returning the best match.
    async fn geocode(&self, address: &str) -> Result<GeocodedLocation, GeocodeError>;
}

/// Geocoding client backed by the Google Geocoding JSON API.
pub struct GoogleGeocoder {
    client: Client,
    config: GeocoderConfig,
}

/// Top-level response from the geocoding API
#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    /// Provider status string, "OK" on success
    pub status: String,
    /// Candidate matches, best first
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

/// A single geocoding candidate
#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    /// Canonical address for this candidate
    pub formatted_address: String,
    /// Geometry block holding the coordinates
    pub geometry: Geometry,
}

/// Geometry block of a geocoding candidate
#[derive(Debug, Deserialize)]
pub struct Geometry {
    /// Coordinates of the candidate
    pub location: LatLng,
}

/// A latitude/longitude pair
#[derive(Debug, Deserialize)]
pub struct LatLng {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
}

impl GoogleGeocoder {
    /// Creates a new geocoding client from the given configuration.
    pub fn new(config: GeocoderConfig) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| GeocodeError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }
}

#[async_trait::async_trait]
impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, address: &str) -> Result<GeocodedLocation, GeocodeError> {
        debug!("Geocoding address: {}", address);

        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[("address", address), ("key", &self.config.api_key)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeocodeError::Api(format!("HTTP {}", response.status())));
        }

        let body: GeocodeResponse = response.json().await?;
        best_match(body)
    }
}

/// Picks the best candidate out of a provider response.
///
/// "ZERO_RESULTS" and an empty result list both count as no usable result,
/// matching the create/update abort semantics upstream.
pub fn best_match(response: GeocodeResponse) -> Result<GeocodedLocation, GeocodeError> {
    match response.status.as_str() {
        "OK" => {}
        "ZERO_RESULTS" => return Err(GeocodeError::ZeroResults),
        other => return Err(GeocodeError::Api(other.to_string())),
    }

    let first = response.results.into_iter().next().ok_or(GeocodeError::ZeroResults)?;

    Ok(GeocodedLocation {
        latitude: first.geometry.location.lat,
        longitude: first.geometry.location.lng,
        formatted_address: first.formatted_address,
    })
}
