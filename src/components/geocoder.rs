use crate::config::Config;
use crate::error::{geocoding_error, SunResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

/// Coordinates resolved from a free-text place name
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: Option<String>,
}

/// Resolves a place name such as "Paris, France" to coordinates
#[async_trait]
pub trait Geocode: Send + Sync {
    /// `Ok(None)` when the service knows no such place
    async fn geocode(&self, query: &str) -> SunResult<Option<Location>>;
}

/// One entry of a Nominatim search response
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: Option<String>,
}

impl NominatimPlace {
    fn into_location(self) -> SunResult<Location> {
        let latitude = self
            .lat
            .parse::<f64>()
            .map_err(|e| geocoding_error(&format!("Invalid latitude '{}': {}", self.lat, e)))?;
        let longitude = self
            .lon
            .parse::<f64>()
            .map_err(|e| geocoding_error(&format!("Invalid longitude '{}': {}", self.lon, e)))?;

        Ok(Location {
            latitude,
            longitude,
            display_name: self.display_name,
        })
    }
}

/// Geocoder backed by the OpenStreetMap Nominatim search API
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
    user_agent: String,
}

impl NominatimGeocoder {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            base_url: config.nominatim_url.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
        }
    }

    fn search_url(&self, query: &str) -> SunResult<Url> {
        let mut url = Url::parse(&format!("{}/search", self.base_url))
            .map_err(|e| geocoding_error(&format!("Failed to parse URL: {}", e)))?;

        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("format", "json")
            .append_pair("limit", "1");

        Ok(url)
    }
}

#[async_trait]
impl Geocode for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> SunResult<Option<Location>> {
        let url = self.search_url(query)?;
        debug!("Geocoding '{}' via {}", query, url);

        let response = self
            .client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| geocoding_error(&format!("Failed to reach geocoder: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(geocoding_error(&format!(
                "Geocoding failed: HTTP {} - {}",
                status, error_body
            )));
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| geocoding_error(&format!("Failed to parse geocoder response: {}", e)))?;

        places
            .into_iter()
            .next()
            .map(NominatimPlace::into_location)
            .transpose()
    }
}
