//! Overlay reconciliation: the map port and the synchronizer.
//!
//! This use case sits at the application layer and delegates to a
//! [`MapCanvas`] trait object for the actual map-widget calls.  The adapter
//! implementations are in the infrastructure layer.
//!
//! # Reconciliation model (for beginners)
//!
//! The synchronizer never applies incremental deltas.  After every state
//! change it recomputes, per overlay kind, the *full desired set* of
//! overlays from the current [`DomainStateStore`] contents and compares it
//! against what the [`OverlayRegistry`] says is on the canvas:
//!
//! - equal → nothing happens, zero canvas calls;
//! - different → that kind's overlays are destroyed in full and recreated
//!   in full (atomic replacement — overlay counts are small, correctness
//!   beats incremental cleverness).
//!
//! Because the desired set is a pure function of the latest store contents,
//! the visual state after a burst of rapid changes is always correct no
//! matter how many intermediate reconciliations were coalesced.

use std::sync::Arc;

use dispatch_core::{color_for_vehicle, decode_route, GeoPoint, RouteColor};
use thiserror::Error;
use tracing::debug;

use crate::application::registry::{
    Overlay, OverlayHandle, OverlayRegistry, OverlayKind, DEPOT_KEY,
};
use crate::application::state::{DomainStateStore, StateChange};

/// Error type for map canvas operations.
#[derive(Debug, Error)]
pub enum MapError {
    /// The underlying map provider rejected or failed the call.
    #[error("map provider error: {0}")]
    Provider(String),
}

/// Marker icon families.  The adapter maps these onto provider icons
/// (the original UI used a blue dot for the depot, red dots for stops).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStyle {
    Depot,
    Delivery,
}

/// The complete description of one desired overlay: geometry plus style.
///
/// Stored in the registry next to the live handle so a later reconciliation
/// can tell "unchanged" from "needs replacing" without asking the provider.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlaySpec {
    Marker {
        position: GeoPoint,
        label: String,
        style: MarkerStyle,
    },
    Path {
        points: Vec<GeoPoint>,
        color: RouteColor,
    },
}

/// Provider-agnostic map widget capability surface.
///
/// This is everything the client core consumes from a map provider; a real
/// provider bridge and the in-memory test canvas both implement it.
pub trait MapCanvas: Send + Sync {
    /// Places a marker and returns its native handle.
    fn create_marker(
        &self,
        position: GeoPoint,
        label: &str,
        style: MarkerStyle,
    ) -> Result<OverlayHandle, MapError>;

    /// Draws a connected path and returns its native handle.
    fn create_path(&self, points: &[GeoPoint], color: RouteColor) -> Result<OverlayHandle, MapError>;

    /// Destroys the overlay behind `handle`.
    fn remove_overlay(&self, handle: OverlayHandle) -> Result<(), MapError>;

    /// Moves the viewport center to `position`.
    fn pan_to(&self, position: GeoPoint) -> Result<(), MapError>;
}

/// Keeps the overlay set in correspondence with the domain state.
///
/// Owns the [`OverlayRegistry`]; no other component creates or destroys
/// overlays.
pub struct OverlaySynchronizer {
    canvas: Arc<dyn MapCanvas>,
    registry: OverlayRegistry,
}

impl OverlaySynchronizer {
    /// Creates a synchronizer over an initialised map canvas.
    pub fn new(canvas: Arc<dyn MapCanvas>) -> Self {
        Self {
            canvas,
            registry: OverlayRegistry::new(),
        }
    }

    /// Read access to the registry, for status display and tests.
    pub fn registry(&self) -> &OverlayRegistry {
        &self.registry
    }

    /// Reconciles the overlay set after `change`.
    ///
    /// Depot and delivery changes invalidate the route index space, so both
    /// also reconcile route overlays (the store has already cleared the
    /// routes themselves — see [`DomainStateStore`]).
    ///
    /// # Errors
    ///
    /// Returns [`MapError`] if a canvas call fails.  The registry never
    /// records a handle that was not actually created, and never keeps one
    /// that was destroyed.
    pub fn apply(&mut self, change: StateChange, store: &DomainStateStore) -> Result<(), MapError> {
        match change {
            StateChange::Depot => {
                self.reconcile_depot(store)?;
                self.reconcile_routes(store)?;
            }
            StateChange::Deliveries => {
                self.reconcile_deliveries(store)?;
                self.reconcile_routes(store)?;
            }
            StateChange::Routes => self.reconcile_routes(store)?,
        }
        Ok(())
    }

    // ── Per-kind reconciliation ───────────────────────────────────────────────

    fn reconcile_depot(&mut self, store: &DomainStateStore) -> Result<(), MapError> {
        let desired = store.depot().map(|depot| OverlaySpec::Marker {
            position: depot.position(),
            label: "Depot".to_string(),
            style: MarkerStyle::Depot,
        });

        let current = self.registry.get(OverlayKind::Depot, DEPOT_KEY).map(|o| &o.spec);
        if current == desired.as_ref() {
            return Ok(());
        }

        self.registry.remove(&*self.canvas, OverlayKind::Depot, DEPOT_KEY)?;
        if let Some(spec) = desired {
            let handle = self.instantiate(&spec)?;
            self.registry
                .set(&*self.canvas, OverlayKind::Depot, DEPOT_KEY, Overlay { spec, handle })?;
            // The viewport follows the depot when it actually moves.
            if let Some(depot) = store.depot() {
                self.canvas.pan_to(depot.position())?;
            }
        }
        debug!(present = store.depot().is_some(), "depot overlay reconciled");
        Ok(())
    }

    fn reconcile_deliveries(&mut self, store: &DomainStateStore) -> Result<(), MapError> {
        let desired: Vec<OverlaySpec> = store
            .deliveries()
            .iter()
            .map(|delivery| OverlaySpec::Marker {
                position: delivery.position(),
                label: delivery.address.clone(),
                style: MarkerStyle::Delivery,
            })
            .collect();

        if self.kind_matches(OverlayKind::Delivery, &desired) {
            return Ok(());
        }

        self.registry.remove_all_of_kind(&*self.canvas, OverlayKind::Delivery)?;
        for (key, spec) in desired.into_iter().enumerate() {
            let handle = self.instantiate(&spec)?;
            self.registry
                .set(&*self.canvas, OverlayKind::Delivery, key, Overlay { spec, handle })?;
        }
        debug!(count = store.deliveries().len(), "delivery overlays reconciled");
        Ok(())
    }

    fn reconcile_routes(&mut self, store: &DomainStateStore) -> Result<(), MapError> {
        // Decode against the *current* depot and deliveries; empty decoded
        // paths produce no overlay at all.
        let desired: Vec<(usize, OverlaySpec)> = store
            .routes()
            .iter()
            .enumerate()
            .filter_map(|(k, route)| {
                let points = decode_route(route, store.depot(), store.deliveries());
                if points.is_empty() {
                    return None;
                }
                Some((k, OverlaySpec::Path { points, color: color_for_vehicle(k) }))
            })
            .collect();

        let current: Vec<(usize, &OverlaySpec)> = self
            .registry
            .all_of_kind(OverlayKind::Route)
            .into_iter()
            .map(|(key, overlay)| (key, &overlay.spec))
            .collect();
        let unchanged = current.len() == desired.len()
            && current
                .iter()
                .zip(desired.iter())
                .all(|((ck, cs), (dk, ds))| ck == dk && *cs == ds);
        if unchanged {
            return Ok(());
        }

        // Full atomic replacement: never a partial route-overlay update.
        self.registry.remove_all_of_kind(&*self.canvas, OverlayKind::Route)?;
        for (key, spec) in desired {
            let handle = self.instantiate(&spec)?;
            self.registry
                .set(&*self.canvas, OverlayKind::Route, key, Overlay { spec, handle })?;
        }
        debug!(
            vehicles = store.routes().len(),
            drawn = self.registry.count_of_kind(OverlayKind::Route),
            "route overlays reconciled"
        );
        Ok(())
    }

    // ── Helpers ───────────────────────────────────────────────────────────────

    /// `true` when the registry holds exactly `desired` for `kind`, densely
    /// keyed `0..len` in order.
    fn kind_matches(&self, kind: OverlayKind, desired: &[OverlaySpec]) -> bool {
        let current = self.registry.all_of_kind(kind);
        current.len() == desired.len()
            && current
                .iter()
                .zip(desired.iter())
                .enumerate()
                .all(|(i, ((key, overlay), spec))| *key == i && overlay.spec == *spec)
    }

    fn instantiate(&self, spec: &OverlaySpec) -> Result<OverlayHandle, MapError> {
        match spec {
            OverlaySpec::Marker { position, label, style } => {
                self.canvas.create_marker(*position, label, *style)
            }
            OverlaySpec::Path { points, color } => self.canvas.create_path(points, *color),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
