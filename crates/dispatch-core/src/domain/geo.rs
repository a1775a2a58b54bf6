//! Geographic domain entities.
//!
//! The backend identifies every stop by *position*: the depot is node 0 and
//! the delivery stored at sequence position `i - 1` is node `i`.  Nothing in
//! these structs carries a synthetic ID — sequence order is the identity, so
//! preserving the order the backend returns is part of the contract.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by domain-level validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// A delivery's demand quantity must be at least 1.
    #[error("delivery demand must be at least 1, got {0}")]
    InvalidDemand(u32),

    /// An address string was empty or whitespace-only.
    #[error("address must not be empty")]
    EmptyAddress,
}

/// A WGS-84 coordinate pair.
///
/// This is the unit the map port consumes: decoded routes are sequences of
/// `GeoPoint`s and markers are placed at a `GeoPoint`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// The single fixed origin/return point for all vehicle routes.
///
/// At most one depot exists per session; it is absent until the operator
/// sets one.  The backend stores it authoritatively, so the client treats
/// its own copy as a cache that is refreshed at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Depot {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// The free-text address the coordinates were geocoded from.
    pub address: String,
}

impl Depot {
    /// Creates a depot from geocoded coordinates and the source address.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyAddress`] if `address` is blank.
    pub fn new(latitude: f64, longitude: f64, address: impl Into<String>) -> Result<Self, DomainError> {
        let address = address.into();
        if address.trim().is_empty() {
            return Err(DomainError::EmptyAddress);
        }
        Ok(Self { latitude, longitude, address })
    }

    /// The depot's map position.
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// A delivery stop with a demand quantity that a vehicle must visit.
///
/// Identity is the stop's position in the ordered deliveries sequence;
/// there is deliberately no ID field here.  The backend row ID that comes
/// over the wire is dropped at the protocol boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    /// The free-text address of the stop.
    pub address: String,
    /// Demand quantity; always ≥ 1.
    pub demand: u32,
    /// Latitude in degrees (geocoded by the backend).
    pub latitude: f64,
    /// Longitude in degrees (geocoded by the backend).
    pub longitude: f64,
}

impl Delivery {
    /// Creates a delivery, validating the domain rules.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidDemand`] if `demand` is 0 and
    /// [`DomainError::EmptyAddress`] if `address` is blank.
    pub fn new(
        address: impl Into<String>,
        demand: u32,
        latitude: f64,
        longitude: f64,
    ) -> Result<Self, DomainError> {
        let address = address.into();
        if address.trim().is_empty() {
            return Err(DomainError::EmptyAddress);
        }
        if demand == 0 {
            return Err(DomainError::InvalidDemand(demand));
        }
        Ok(Self { address, demand, latitude, longitude })
    }

    /// The stop's map position.
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depot_new_accepts_valid_address() {
        let depot = Depot::new(40.7128, -74.0060, "1 Main St").unwrap();
        assert_eq!(depot.position(), GeoPoint::new(40.7128, -74.0060));
        assert_eq!(depot.address, "1 Main St");
    }

    #[test]
    fn test_depot_new_rejects_blank_address() {
        let result = Depot::new(0.0, 0.0, "   ");
        assert_eq!(result.unwrap_err(), DomainError::EmptyAddress);
    }

    #[test]
    fn test_delivery_new_rejects_zero_demand() {
        let result = Delivery::new("5 Oak Ave", 0, 40.0, -73.0);
        assert_eq!(result.unwrap_err(), DomainError::InvalidDemand(0));
    }

    #[test]
    fn test_delivery_new_accepts_demand_of_one() {
        let delivery = Delivery::new("5 Oak Ave", 1, 40.0, -73.0).unwrap();
        assert_eq!(delivery.demand, 1);
        assert_eq!(delivery.position(), GeoPoint::new(40.0, -73.0));
    }

    #[test]
    fn test_delivery_serializes_with_backend_field_names() {
        // The wire contract uses full `latitude`/`longitude` names.
        let delivery = Delivery::new("5 Oak Ave", 2, 40.5, -73.5).unwrap();
        let json = serde_json::to_value(&delivery).unwrap();
        assert_eq!(json["latitude"], 40.5);
        assert_eq!(json["demand"], 2);
    }
}
