//! JSON bodies for the backend REST endpoints.
//!
//! The contract, endpoint by endpoint:
//!
//! ```text
//! GET  /get_depot        → { "depot": Depot | null }
//! GET  /deliveries       → { "deliveries": [DeliveryRecord, …] }
//! POST /set_depot        ← { "latitude", "longitude", "address" }         → 2xx
//! POST /add_delivery     ← { "address", "demand" }                        → 2xx
//! POST /optimize_routes  ← { "num_vehicles", "depot" }
//!                        → { "optimized_routes": [[node, …], …] }
//! ```
//!
//! The backend geocodes `add_delivery` addresses itself; the client never
//! sends delivery coordinates.

use serde::{Deserialize, Serialize};

use crate::domain::geo::{Delivery, Depot};
use crate::domain::route::RoutePlan;

/// Response body of `GET /get_depot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepotEnvelope {
    /// The stored depot, or `null` when none has been set yet.
    pub depot: Option<Depot>,
}

/// One delivery row as the backend returns it.
///
/// Carries the backend's database row ID, which the domain ignores —
/// delivery identity on the client is positional.  [`into_delivery`] strips
/// it at the protocol boundary.
///
/// [`into_delivery`]: DeliveryRecord::into_delivery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryRecord {
    /// Backend row ID; present in responses, never sent by the client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub address: String,
    pub demand: u32,
    pub latitude: f64,
    pub longitude: f64,
}

impl DeliveryRecord {
    /// Converts the wire row into the domain entity, dropping the row ID.
    pub fn into_delivery(self) -> Delivery {
        Delivery {
            address: self.address,
            demand: self.demand,
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Response body of `GET /deliveries`.
///
/// Order is significant: the backend's ordering defines the node-index
/// space the optimizer will use, so it must be preserved as received.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveriesEnvelope {
    pub deliveries: Vec<DeliveryRecord>,
}

/// Request body of `POST /set_depot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetDepotRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
}

/// Request body of `POST /add_delivery`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddDeliveryRequest {
    pub address: String,
    pub demand: u32,
}

/// Request body of `POST /optimize_routes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeRequest {
    pub num_vehicles: u32,
    pub depot: Depot,
}

/// Response body of `POST /optimize_routes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeResponse {
    pub optimized_routes: RoutePlan,
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depot_envelope_deserializes_null_depot() {
        let envelope: DepotEnvelope = serde_json::from_str(r#"{ "depot": null }"#).unwrap();
        assert!(envelope.depot.is_none());
    }

    #[test]
    fn test_depot_envelope_deserializes_present_depot() {
        let json = r#"{ "depot": { "latitude": 40.7, "longitude": -74.0, "address": "Warehouse" } }"#;
        let envelope: DepotEnvelope = serde_json::from_str(json).unwrap();
        let depot = envelope.depot.unwrap();
        assert_eq!(depot.address, "Warehouse");
        assert_eq!(depot.latitude, 40.7);
    }

    #[test]
    fn test_delivery_record_conversion_drops_row_id() {
        let json = r#"{ "id": 17, "address": "5 Oak Ave", "demand": 3,
                        "latitude": 41.0, "longitude": -73.0 }"#;
        let record: DeliveryRecord = serde_json::from_str(json).unwrap();

        let delivery = record.into_delivery();

        assert_eq!(delivery.address, "5 Oak Ave");
        assert_eq!(delivery.demand, 3);
    }

    #[test]
    fn test_deliveries_envelope_preserves_order() {
        let json = r#"{ "deliveries": [
            { "id": 2, "address": "B", "demand": 1, "latitude": 1.0, "longitude": 1.0 },
            { "id": 1, "address": "A", "demand": 1, "latitude": 2.0, "longitude": 2.0 }
        ] }"#;

        let envelope: DeliveriesEnvelope = serde_json::from_str(json).unwrap();

        // Wire order wins, not row-ID order.
        assert_eq!(envelope.deliveries[0].address, "B");
        assert_eq!(envelope.deliveries[1].address, "A");
    }

    #[test]
    fn test_optimize_response_deserializes_nested_routes() {
        let json = r#"{ "optimized_routes": [[0, 1, 2, 0], [], [0, 3, 0]] }"#;
        let response: OptimizeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.optimized_routes.len(), 3);
        assert_eq!(response.optimized_routes[0], vec![0, 1, 2, 0]);
        assert!(response.optimized_routes[1].is_empty());
    }

    #[test]
    fn test_add_delivery_request_serializes_without_coordinates() {
        let request = AddDeliveryRequest { address: "5 Oak Ave".to_string(), demand: 1 };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("latitude").is_none());
        assert_eq!(json["demand"], 1);
    }
}
