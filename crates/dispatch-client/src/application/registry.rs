//! The overlay registry: owned map overlay handles keyed by entity identity.
//!
//! Every live overlay on the map canvas is recorded here, together with the
//! geometry and style it was created with.  The stored [`OverlaySpec`] is
//! what makes cheap reconciliation possible: the synchronizer compares the
//! desired spec against the recorded one and touches the canvas only when
//! they differ.
//!
//! # Handle ownership
//!
//! Native handles are owned exclusively by this registry; no other component
//! keeps one.  [`OverlayRegistry::set`] on an occupied key tears the old
//! handle down through the map port *before* installing the new one, and
//! removal always takes the entry out of the registry before the handle is
//! destroyed — so at no instant do two registry entries (or a registry entry
//! and a dangling reference) share a live handle.

use std::collections::BTreeMap;

use crate::application::reconcile::{MapCanvas, MapError, OverlaySpec};

/// The three overlay families the client manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OverlayKind {
    /// The single depot marker.
    Depot,
    /// One marker per delivery, keyed by sequence position.
    Delivery,
    /// One polyline per vehicle route, keyed by plan position.
    Route,
}

/// Entity key within a kind.
///
/// For `Depot` this is always [`DEPOT_KEY`]; for `Delivery` it is the
/// delivery's position in the deliveries sequence; for `Route` it is the
/// route's position in the plan.
pub type EntityKey = usize;

/// The singleton key used for the depot overlay.
pub const DEPOT_KEY: EntityKey = 0;

/// An opaque handle to a native overlay object on the map canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayHandle(pub u64);

/// One live overlay: the spec it was created from plus its native handle.
#[derive(Debug, Clone)]
pub struct Overlay {
    pub spec: OverlaySpec,
    pub handle: OverlayHandle,
}

/// Registry of all live overlays, keyed by `(kind, entity key)`.
#[derive(Debug, Default)]
pub struct OverlayRegistry {
    overlays: BTreeMap<(OverlayKind, EntityKey), Overlay>,
}

impl OverlayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs an overlay under `(kind, key)`.
    ///
    /// If the key already holds an overlay, the previous handle is first
    /// removed from the registry and destroyed through `canvas`.
    ///
    /// # Errors
    ///
    /// Returns [`MapError`] if tearing down the previous handle fails; in
    /// that case the new overlay is not installed.
    pub fn set(
        &mut self,
        canvas: &dyn MapCanvas,
        kind: OverlayKind,
        key: EntityKey,
        overlay: Overlay,
    ) -> Result<(), MapError> {
        if let Some(previous) = self.overlays.remove(&(kind, key)) {
            canvas.remove_overlay(previous.handle)?;
        }
        self.overlays.insert((kind, key), overlay);
        Ok(())
    }

    /// Removes and destroys the overlay under `(kind, key)`, if any.
    ///
    /// Returns `true` if an overlay existed.
    pub fn remove(
        &mut self,
        canvas: &dyn MapCanvas,
        kind: OverlayKind,
        key: EntityKey,
    ) -> Result<bool, MapError> {
        match self.overlays.remove(&(kind, key)) {
            Some(overlay) => {
                canvas.remove_overlay(overlay.handle)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Removes and destroys every overlay of `kind`.
    pub fn remove_all_of_kind(
        &mut self,
        canvas: &dyn MapCanvas,
        kind: OverlayKind,
    ) -> Result<(), MapError> {
        let keys: Vec<EntityKey> = self
            .overlays
            .range((kind, EntityKey::MIN)..=(kind, EntityKey::MAX))
            .map(|((_, key), _)| *key)
            .collect();
        for key in keys {
            // Entry leaves the registry before the handle is destroyed.
            if let Some(overlay) = self.overlays.remove(&(kind, key)) {
                canvas.remove_overlay(overlay.handle)?;
            }
        }
        Ok(())
    }

    /// The overlay under `(kind, key)`, if any.
    pub fn get(&self, kind: OverlayKind, key: EntityKey) -> Option<&Overlay> {
        self.overlays.get(&(kind, key))
    }

    /// All overlays of `kind` with their keys, in ascending key order.
    pub fn all_of_kind(&self, kind: OverlayKind) -> Vec<(EntityKey, &Overlay)> {
        self.overlays
            .range((kind, EntityKey::MIN)..=(kind, EntityKey::MAX))
            .map(|((_, key), overlay)| (*key, overlay))
            .collect()
    }

    /// Number of live overlays of `kind`.
    pub fn count_of_kind(&self, kind: OverlayKind) -> usize {
        self.all_of_kind(kind).len()
    }

    /// Total number of live overlays.
    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
