//! HTTP adapter for the geocoding provider.
//!
//! Implements the [`Geocoder`] port over `reqwest`.  The provider answers a
//! free-text address with a status string and a list of candidate results;
//! only the first result is ever used, and any non-`"OK"` status is a
//! recoverable lookup failure the operator can retry with a corrected
//! address.
//!
//! The provider's JSON shapes are private to this module — the application
//! layer only ever sees a [`GeoPoint`] or a [`GeocodeError`].

use async_trait::async_trait;
use dispatch_core::GeoPoint;
use serde::Deserialize;
use tracing::debug;

use crate::application::commands::{GeocodeError, Geocoder};

// ── Provider response shapes ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Debug, Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}

impl GeocodeResponse {
    /// Applies the provider contract: `"OK"` status plus at least one
    /// result, of which the first wins.
    fn into_point(self) -> Result<GeoPoint, GeocodeError> {
        if self.status != "OK" {
            return Err(GeocodeError::Unresolved(self.status));
        }
        let first = self
            .results
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::Unresolved("empty result list".to_string()))?;
        Ok(GeoPoint::new(first.geometry.location.lat, first.geometry.location.lng))
    }
}

// ── Adapter ───────────────────────────────────────────────────────────────────

/// `reqwest`-backed geocoding client.
#[derive(Debug, Clone)]
pub struct HttpGeocoder {
    endpoint: String,
    api_key: String,
    http: reqwest::Client,
}

impl HttpGeocoder {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Geocoder for HttpGeocoder {
    async fn geocode(&self, address: &str) -> Result<GeoPoint, GeocodeError> {
        debug!(%address, "geocoding address");
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("address", address), ("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;

        let decoded: GeocodeResponse = response
            .json()
            .await
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;
        decoded.into_point()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_response_uses_first_result_only() {
        let json = r#"{
            "status": "OK",
            "results": [
                { "geometry": { "location": { "lat": 40.7128, "lng": -74.0060 } } },
                { "geometry": { "location": { "lat": 0.0, "lng": 0.0 } } }
            ]
        }"#;
        let decoded: GeocodeResponse = serde_json::from_str(json).unwrap();

        let point = decoded.into_point().unwrap();

        assert_eq!(point, GeoPoint::new(40.7128, -74.0060));
    }

    #[test]
    fn test_non_ok_status_is_unresolved_error() {
        let json = r#"{ "status": "ZERO_RESULTS", "results": [] }"#;
        let decoded: GeocodeResponse = serde_json::from_str(json).unwrap();

        let result = decoded.into_point();

        assert!(matches!(result, Err(GeocodeError::Unresolved(s)) if s == "ZERO_RESULTS"));
    }

    #[test]
    fn test_ok_status_with_no_results_is_unresolved_error() {
        // Some providers answer OK with an empty list.
        let json = r#"{ "status": "OK", "results": [] }"#;
        let decoded: GeocodeResponse = serde_json::from_str(json).unwrap();

        assert!(matches!(decoded.into_point(), Err(GeocodeError::Unresolved(_))));
    }

    #[test]
    fn test_missing_results_field_deserializes_as_empty() {
        let json = r#"{ "status": "OVER_QUERY_LIMIT" }"#;
        let decoded: GeocodeResponse = serde_json::from_str(json).unwrap();
        assert!(decoded.results.is_empty());
    }
}
