//! Geocoding provider
//!
//! Resolves a free-text place name through the Nominatim search API.

use super::{Coordinates, GeocodeError};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Default Nominatim search endpoint.
pub const NOMINATIM_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";

/// Trait for geocoding services
pub trait Geocoder: Send + Sync {
    /// Look up a place. `Ok(None)` means the service had no match.
    fn geocode(
        &self,
        query: &str,
    ) -> impl std::future::Future<Output = Result<Option<Coordinates>, GeocodeError>> + Send;
}

/// Nominatim search result (only the fields we use)
#[derive(Debug, serde::Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

/// Geocoder backed by OpenStreetMap Nominatim
pub struct NominatimGeocoder {
    client: Client,
    endpoint: String,
}

impl NominatimGeocoder {
    /// Create a geocoder. Nominatim requires an identifying user agent.
    pub fn new(user_agent: &str, endpoint: &str) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| GeocodeError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Parse a Nominatim JSON body, taking the first match.
pub(crate) fn parse_places(body: &str) -> Result<Option<Coordinates>, GeocodeError> {
    let places: Vec<NominatimPlace> =
        serde_json::from_str(body).map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;

    let Some(place) = places.first() else {
        return Ok(None);
    };

    let lat = place
        .lat
        .parse::<f64>()
        .map_err(|e| GeocodeError::InvalidResponse(format!("lat {:?}: {}", place.lat, e)))?;
    let lon = place
        .lon
        .parse::<f64>()
        .map_err(|e| GeocodeError::InvalidResponse(format!("lon {:?}: {}", place.lon, e)))?;

    let coordinates = Coordinates::new(lat, lon);
    if !coordinates.is_valid() {
        return Err(GeocodeError::InvalidResponse(format!(
            "coordinates out of range: {}, {}",
            lat, lon
        )));
    }
    Ok(Some(coordinates))
}

impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError> {
        tracing::debug!("Geocoding {:?} via {}", query, self.endpoint);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| GeocodeError::NetworkError(e.to_string()))?;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => return Err(GeocodeError::RateLimited),
            status if !status.is_success() => {
                return Err(GeocodeError::RequestFailed(status.to_string()))
            }
            _ => {}
        }

        let body = response
            .text()
            .await
            .map_err(|e| GeocodeError::NetworkError(e.to_string()))?;

        parse_places(&body)
    }
}
