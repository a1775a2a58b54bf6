//! HTTP adapter for the backend REST endpoints.
//!
//! Implements the [`BackendApi`] port over `reqwest`, speaking the JSON
//! contract defined in [`dispatch_core::protocol::messages`].  Failures are
//! terminal at the point of occurrence: they are reported to the caller,
//! never retried here.

use async_trait::async_trait;
use dispatch_core::protocol::messages::{
    AddDeliveryRequest, DeliveriesEnvelope, DepotEnvelope, OptimizeRequest, OptimizeResponse,
    SetDepotRequest,
};
use dispatch_core::{Delivery, Depot, RoutePlan};
use tracing::debug;

use crate::application::commands::{BackendApi, BackendError};

/// `reqwest`-backed client for the backend REST endpoints.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    http: reqwest::Client,
}

impl HttpBackend {
    /// Creates a client for the backend at `base_url`
    /// (e.g. `http://127.0.0.1:5000`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Maps the status check shared by every call.
    fn check_status(response: &reqwest::Response) -> Result<(), BackendError> {
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status.as_u16()));
        }
        Ok(())
    }
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn fetch_depot(&self) -> Result<Option<Depot>, BackendError> {
        let url = self.endpoint("/get_depot");
        debug!(%url, "fetching depot");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        Self::check_status(&response)?;
        let envelope: DepotEnvelope = response
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(envelope.depot)
    }

    async fn fetch_deliveries(&self) -> Result<Vec<Delivery>, BackendError> {
        let url = self.endpoint("/deliveries");
        debug!(%url, "fetching deliveries");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        Self::check_status(&response)?;
        let envelope: DeliveriesEnvelope = response
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        // Wire order is the node-index space; keep it exactly.
        Ok(envelope
            .deliveries
            .into_iter()
            .map(|record| record.into_delivery())
            .collect())
    }

    async fn store_depot(&self, depot: &Depot) -> Result<(), BackendError> {
        let body = SetDepotRequest {
            latitude: depot.latitude,
            longitude: depot.longitude,
            address: depot.address.clone(),
        };
        let response = self
            .http
            .post(self.endpoint("/set_depot"))
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        Self::check_status(&response)
    }

    async fn add_delivery(&self, address: &str, demand: u32) -> Result<(), BackendError> {
        let body = AddDeliveryRequest { address: address.to_string(), demand };
        let response = self
            .http
            .post(self.endpoint("/add_delivery"))
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        Self::check_status(&response)
    }

    async fn optimize_routes(
        &self,
        num_vehicles: u32,
        depot: &Depot,
    ) -> Result<RoutePlan, BackendError> {
        let body = OptimizeRequest { num_vehicles, depot: depot.clone() };
        let response = self
            .http
            .post(self.endpoint("/optimize_routes"))
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        Self::check_status(&response)?;
        let decoded: OptimizeResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(decoded.optimized_routes)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
