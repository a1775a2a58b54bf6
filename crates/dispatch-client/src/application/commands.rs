//! Operator-facing use cases: set depot, add delivery, optimize routes,
//! startup resync.
//!
//! Each command validates locally first, then talks to the external
//! collaborators through the [`BackendApi`] and [`Geocoder`] ports, and only
//! mutates the local [`DomainStateStore`] once the backend has confirmed.
//! A failed call therefore leaves domain state bit-identical — there are no
//! optimistic local updates to roll back, and no failure from one command
//! can corrupt unrelated state.
//!
//! # Command serialization
//!
//! All commands take `&mut self`, so a session processes one command at a
//! time: a second geocode lookup cannot start while the first is in flight.
//! This is the chosen resolution of the overlapping-request race — requests
//! are serialized per session rather than raced and resolved
//! last-write-wins.

use std::sync::Arc;

use async_trait::async_trait;
use dispatch_core::{Delivery, Depot, DomainError, GeoPoint, RoutePlan};
use thiserror::Error;
use tracing::{info, warn};

use crate::application::reconcile::{MapCanvas, MapError, OverlaySynchronizer};
use crate::application::state::DomainStateStore;

/// Error type for geocoding lookups.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// The provider answered but could not resolve the address
    /// (non-"OK" status or an empty result list).  Recoverable: the
    /// operator can correct the address and retry.
    #[error("address could not be resolved: {0}")]
    Unresolved(String),
    /// The provider could not be reached or answered garbage.
    #[error("geocoding transport error: {0}")]
    Transport(String),
}

/// Error type for backend calls.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend transport error: {0}")]
    Transport(String),
    #[error("backend returned HTTP status {0}")]
    Status(u16),
    #[error("backend response could not be decoded: {0}")]
    Decode(String),
}

/// Errors surfaced to the operator by a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Local validation failed; nothing was sent anywhere.
    #[error(transparent)]
    Validation(#[from] DomainError),
    /// Route optimization needs a depot first.
    #[error("no depot is set; set a depot before optimizing routes")]
    DepotNotSet,
    #[error(transparent)]
    Geocode(#[from] GeocodeError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Map(#[from] MapError),
}

/// Port to the geocoding provider.
///
/// Implementations resolve a free-text address to coordinates; only the
/// provider's first result is ever used.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<GeoPoint, GeocodeError>;
}

/// Port to the backend REST endpoints.
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// `GET /get_depot`
    async fn fetch_depot(&self) -> Result<Option<Depot>, BackendError>;
    /// `GET /deliveries` — order as returned is authoritative.
    async fn fetch_deliveries(&self) -> Result<Vec<Delivery>, BackendError>;
    /// `POST /set_depot`
    async fn store_depot(&self, depot: &Depot) -> Result<(), BackendError>;
    /// `POST /add_delivery` — the backend geocodes the address itself.
    async fn add_delivery(&self, address: &str, demand: u32) -> Result<(), BackendError>;
    /// `POST /optimize_routes`
    async fn optimize_routes(&self, num_vehicles: u32, depot: &Depot)
        -> Result<RoutePlan, BackendError>;
}

/// The planning session: one per running client.
///
/// Owns the domain state store and the overlay synchronizer; every state
/// mutation flows through here and is immediately reconciled.
pub struct PlannerSession {
    backend: Arc<dyn BackendApi>,
    geocoder: Arc<dyn Geocoder>,
    store: DomainStateStore,
    synchronizer: OverlaySynchronizer,
    num_vehicles: u32,
}

impl PlannerSession {
    pub fn new(
        backend: Arc<dyn BackendApi>,
        geocoder: Arc<dyn Geocoder>,
        canvas: Arc<dyn MapCanvas>,
        num_vehicles: u32,
    ) -> Self {
        Self {
            backend,
            geocoder,
            store: DomainStateStore::new(),
            synchronizer: OverlaySynchronizer::new(canvas),
            num_vehicles,
        }
    }

    /// Read access to the domain state, for status display.
    pub fn store(&self) -> &DomainStateStore {
        &self.store
    }

    /// Read access to the synchronizer (and through it the registry).
    pub fn synchronizer(&self) -> &OverlaySynchronizer {
        &self.synchronizer
    }

    // ── Startup resync ────────────────────────────────────────────────────────

    /// Fetches the server-held depot, if any, and reconciles.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] on backend or canvas failure; local state is
    /// unchanged in that case.
    pub async fn resync_depot(&mut self) -> Result<(), CommandError> {
        if let Some(depot) = self.backend.fetch_depot().await? {
            info!(address = %depot.address, "depot restored from backend");
            let change = self.store.set_depot(depot);
            self.synchronizer.apply(change, &self.store)?;
        }
        Ok(())
    }

    /// Fetches the server-held deliveries list and reconciles.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] on backend or canvas failure; local state is
    /// unchanged in that case.
    pub async fn resync_deliveries(&mut self) -> Result<(), CommandError> {
        let deliveries = self.backend.fetch_deliveries().await?;
        info!(count = deliveries.len(), "deliveries restored from backend");
        let change = self.store.replace_deliveries(deliveries);
        self.synchronizer.apply(change, &self.store)?;
        Ok(())
    }

    // ── Commands ──────────────────────────────────────────────────────────────

    /// Geocodes `address`, stores the depot on the backend, then applies it
    /// locally and reconciles.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Validation`] for a blank address (no network
    /// call is made), [`CommandError::Geocode`] when the address does not
    /// resolve, and [`CommandError::Backend`] when the store call fails —
    /// in every error case the local depot is untouched.
    pub async fn set_depot(&mut self, address: &str) -> Result<(), CommandError> {
        if address.trim().is_empty() {
            return Err(DomainError::EmptyAddress.into());
        }

        let point = self.geocoder.geocode(address).await?;
        let depot = Depot::new(point.lat, point.lng, address)?;
        self.backend.store_depot(&depot).await?;

        let change = self.store.set_depot(depot);
        self.synchronizer.apply(change, &self.store)?;
        Ok(())
    }

    /// Registers a delivery on the backend, re-fetches the authoritative
    /// list, then reconciles.
    ///
    /// The backend geocodes the address and assigns the sequence position,
    /// which is why the list is re-fetched instead of appended locally.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Validation`] for a blank address or zero
    /// demand (no network call is made), otherwise propagates backend and
    /// canvas failures with local state unchanged.
    pub async fn add_delivery(&mut self, address: &str, demand: u32) -> Result<(), CommandError> {
        if address.trim().is_empty() {
            return Err(DomainError::EmptyAddress.into());
        }
        if demand == 0 {
            return Err(DomainError::InvalidDemand(demand).into());
        }

        self.backend.add_delivery(address, demand).await?;

        // The insert succeeded even if the refetch below fails; warn rather
        // than pretend the delivery does not exist.
        let deliveries = match self.backend.fetch_deliveries().await {
            Ok(deliveries) => deliveries,
            Err(e) => {
                warn!("delivery stored but list refetch failed: {e}");
                return Err(e.into());
            }
        };
        let change = self.store.replace_deliveries(deliveries);
        self.synchronizer.apply(change, &self.store)?;
        Ok(())
    }

    /// Requests a multi-vehicle optimization and installs the returned plan.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::DepotNotSet`] when no depot exists yet, and
    /// propagates backend/canvas failures with the previous plan left in
    /// place.
    pub async fn optimize_routes(&mut self) -> Result<(), CommandError> {
        let depot = self.store.depot().cloned().ok_or(CommandError::DepotNotSet)?;

        let plan = self.backend.optimize_routes(self.num_vehicles, &depot).await?;
        info!(vehicles = plan.len(), "optimization complete");

        let change = self.store.replace_routes(plan);
        self.synchronizer.apply(change, &self.store)?;
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::registry::OverlayKind;
    use crate::infrastructure::map::mock::MockMapCanvas;
    use std::sync::Mutex;

    // ── Stub ports ────────────────────────────────────────────────────────────

    /// Backend stub with programmable responses and call recording.
    #[derive(Default)]
    struct StubBackend {
        depot: Mutex<Option<Depot>>,
        deliveries: Mutex<Vec<Delivery>>,
        plan: Mutex<RoutePlan>,
        added: Mutex<Vec<(String, u32)>>,
        fail_all: bool,
    }

    #[async_trait]
    impl BackendApi for StubBackend {
        async fn fetch_depot(&self) -> Result<Option<Depot>, BackendError> {
            if self.fail_all {
                return Err(BackendError::Transport("stub down".into()));
            }
            Ok(self.depot.lock().unwrap().clone())
        }

        async fn fetch_deliveries(&self) -> Result<Vec<Delivery>, BackendError> {
            if self.fail_all {
                return Err(BackendError::Transport("stub down".into()));
            }
            Ok(self.deliveries.lock().unwrap().clone())
        }

        async fn store_depot(&self, depot: &Depot) -> Result<(), BackendError> {
            if self.fail_all {
                return Err(BackendError::Status(500));
            }
            *self.depot.lock().unwrap() = Some(depot.clone());
            Ok(())
        }

        async fn add_delivery(&self, address: &str, demand: u32) -> Result<(), BackendError> {
            if self.fail_all {
                return Err(BackendError::Status(500));
            }
            self.added.lock().unwrap().push((address.to_string(), demand));
            // The stub "geocodes" to a fixed offset per stop.
            let position = self.deliveries.lock().unwrap().len() as f64;
            self.deliveries
                .lock()
                .unwrap()
                .push(Delivery::new(address, demand, 40.0 + position, -73.0).unwrap());
            Ok(())
        }

        async fn optimize_routes(
            &self,
            _num_vehicles: u32,
            _depot: &Depot,
        ) -> Result<RoutePlan, BackendError> {
            if self.fail_all {
                return Err(BackendError::Status(400));
            }
            Ok(self.plan.lock().unwrap().clone())
        }
    }

    /// Geocoder stub returning a fixed point, optionally failing.
    struct StubGeocoder {
        result: Result<GeoPoint, &'static str>,
    }

    #[async_trait]
    impl Geocoder for StubGeocoder {
        async fn geocode(&self, _address: &str) -> Result<GeoPoint, GeocodeError> {
            self.result
                .map_err(|msg| GeocodeError::Unresolved(msg.to_string()))
        }
    }

    fn make_session(backend: Arc<StubBackend>) -> (PlannerSession, Arc<MockMapCanvas>) {
        let canvas = Arc::new(MockMapCanvas::new());
        let geocoder = Arc::new(StubGeocoder { result: Ok(GeoPoint::new(40.7, -74.0)) });
        let session = PlannerSession::new(
            backend,
            geocoder,
            Arc::clone(&canvas) as Arc<dyn MapCanvas>,
            4,
        );
        (session, canvas)
    }

    // ── set_depot ─────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_set_depot_stores_on_backend_before_applying_locally() {
        // Arrange
        let backend = Arc::new(StubBackend::default());
        let (mut session, _canvas) = make_session(Arc::clone(&backend));

        // Act
        session.set_depot("1 Main St").await.unwrap();

        // Assert – backend confirmed, local state applied, overlay created
        assert_eq!(backend.depot.lock().unwrap().as_ref().unwrap().address, "1 Main St");
        assert_eq!(session.store().depot().unwrap().address, "1 Main St");
        assert_eq!(session.synchronizer().registry().count_of_kind(OverlayKind::Depot), 1);
    }

    #[tokio::test]
    async fn test_set_depot_rejects_blank_address_without_network_call() {
        let backend = Arc::new(StubBackend::default());
        let (mut session, canvas) = make_session(Arc::clone(&backend));

        let result = session.set_depot("   ").await;

        assert!(matches!(result, Err(CommandError::Validation(DomainError::EmptyAddress))));
        assert!(backend.depot.lock().unwrap().is_none(), "no backend call may happen");
        assert_eq!(canvas.operation_count(), 0);
    }

    #[tokio::test]
    async fn test_set_depot_geocode_failure_leaves_state_unchanged() {
        let backend = Arc::new(StubBackend::default());
        let canvas = Arc::new(MockMapCanvas::new());
        let geocoder = Arc::new(StubGeocoder { result: Err("ZERO_RESULTS") });
        let mut session = PlannerSession::new(
            backend,
            geocoder,
            Arc::clone(&canvas) as Arc<dyn MapCanvas>,
            4,
        );

        let result = session.set_depot("Atlantis").await;

        assert!(matches!(result, Err(CommandError::Geocode(_))));
        assert!(session.store().depot().is_none());
        assert_eq!(canvas.operation_count(), 0);
    }

    #[tokio::test]
    async fn test_set_depot_backend_failure_leaves_state_unchanged() {
        let backend = Arc::new(StubBackend { fail_all: true, ..StubBackend::default() });
        let (mut session, canvas) = make_session(backend);

        let result = session.set_depot("1 Main St").await;

        assert!(matches!(result, Err(CommandError::Backend(_))));
        assert!(session.store().depot().is_none());
        assert_eq!(canvas.operation_count(), 0);
    }

    // ── add_delivery ──────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_add_delivery_posts_then_refetches_authoritative_list() {
        let backend = Arc::new(StubBackend::default());
        let (mut session, _canvas) = make_session(Arc::clone(&backend));

        session.add_delivery("5 Oak Ave", 3).await.unwrap();
        session.add_delivery("9 Elm St", 1).await.unwrap();

        assert_eq!(
            *backend.added.lock().unwrap(),
            vec![("5 Oak Ave".to_string(), 3), ("9 Elm St".to_string(), 1)]
        );
        assert_eq!(session.store().deliveries().len(), 2);
        assert_eq!(
            session.synchronizer().registry().count_of_kind(OverlayKind::Delivery),
            2
        );
    }

    #[tokio::test]
    async fn test_add_delivery_rejects_zero_demand_locally() {
        let backend = Arc::new(StubBackend::default());
        let (mut session, _canvas) = make_session(Arc::clone(&backend));

        let result = session.add_delivery("5 Oak Ave", 0).await;

        assert!(matches!(
            result,
            Err(CommandError::Validation(DomainError::InvalidDemand(0)))
        ));
        assert!(backend.added.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_delivery_clears_existing_routes() {
        // Arrange – a session with a depot, one delivery, and a plan
        let backend = Arc::new(StubBackend::default());
        let (mut session, _canvas) = make_session(Arc::clone(&backend));
        session.set_depot("1 Main St").await.unwrap();
        session.add_delivery("5 Oak Ave", 1).await.unwrap();
        *backend.plan.lock().unwrap() = vec![vec![0, 1, 0]];
        session.optimize_routes().await.unwrap();
        assert_eq!(session.synchronizer().registry().count_of_kind(OverlayKind::Route), 1);

        // Act – the index space shifts
        session.add_delivery("9 Elm St", 1).await.unwrap();

        // Assert – stale routes are gone from state and canvas
        assert!(session.store().routes().is_empty());
        assert_eq!(session.synchronizer().registry().count_of_kind(OverlayKind::Route), 0);
    }

    // ── optimize_routes ───────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_optimize_requires_depot() {
        let backend = Arc::new(StubBackend::default());
        let (mut session, _canvas) = make_session(backend);

        let result = session.optimize_routes().await;

        assert!(matches!(result, Err(CommandError::DepotNotSet)));
    }

    #[tokio::test]
    async fn test_optimize_failure_does_not_touch_deliveries_or_depot() {
        // A failed optimize call must not corrupt unrelated state.
        let backend = Arc::new(StubBackend::default());
        let (mut session, _canvas) = make_session(Arc::clone(&backend));
        session.set_depot("1 Main St").await.unwrap();
        session.add_delivery("5 Oak Ave", 1).await.unwrap();

        backend.plan.lock().unwrap().clear();
        let failing = Arc::new(StubBackend { fail_all: true, ..StubBackend::default() });
        session.backend = failing;
        let result = session.optimize_routes().await;

        assert!(matches!(result, Err(CommandError::Backend(_))));
        assert_eq!(session.store().deliveries().len(), 1);
        assert!(session.store().depot().is_some());
    }

    #[tokio::test]
    async fn test_optimize_installs_plan_and_draws_routes() {
        let backend = Arc::new(StubBackend::default());
        let (mut session, canvas) = make_session(Arc::clone(&backend));
        session.set_depot("1 Main St").await.unwrap();
        session.add_delivery("A", 1).await.unwrap();
        session.add_delivery("B", 1).await.unwrap();
        // Vehicle 1 serves both stops; vehicles 2–4 stay parked.
        *backend.plan.lock().unwrap() = vec![vec![0, 1, 2, 0], vec![], vec![], vec![]];

        session.optimize_routes().await.unwrap();

        assert_eq!(session.store().routes().len(), 4);
        // Only the non-empty decoded route draws an overlay.
        assert_eq!(session.synchronizer().registry().count_of_kind(OverlayKind::Route), 1);
        assert_eq!(canvas.paths().len(), 1);
        assert_eq!(canvas.paths()[0].points.len(), 4);
    }

    // ── resync ────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_resync_restores_server_held_state() {
        let backend = Arc::new(StubBackend::default());
        *backend.depot.lock().unwrap() = Some(Depot::new(40.7, -74.0, "Warehouse").unwrap());
        *backend.deliveries.lock().unwrap() = vec![
            Delivery::new("A", 1, 41.0, -73.0).unwrap(),
            Delivery::new("B", 2, 42.0, -72.0).unwrap(),
        ];
        let (mut session, _canvas) = make_session(backend);

        session.resync_depot().await.unwrap();
        session.resync_deliveries().await.unwrap();

        assert_eq!(session.store().depot().unwrap().address, "Warehouse");
        assert_eq!(session.store().deliveries().len(), 2);
        assert_eq!(session.synchronizer().registry().count_of_kind(OverlayKind::Depot), 1);
        assert_eq!(
            session.synchronizer().registry().count_of_kind(OverlayKind::Delivery),
            2
        );
    }

    #[tokio::test]
    async fn test_resync_depot_with_no_server_depot_is_a_no_op() {
        let backend = Arc::new(StubBackend::default());
        let (mut session, canvas) = make_session(backend);

        session.resync_depot().await.unwrap();

        assert!(session.store().depot().is_none());
        assert_eq!(canvas.operation_count(), 0);
    }
}
