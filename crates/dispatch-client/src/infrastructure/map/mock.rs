//! Mock map canvas for unit testing and headless runs.
//!
//! # Why a mock canvas?
//!
//! A real map provider runs inside a webview and holds native overlay
//! objects that Rust test code cannot observe.  The `MockMapCanvas`
//! replaces every provider call with in-memory recording: each created
//! marker/path, each removal, and each viewport pan is pushed into a
//! `Mutex<Vec<...>>` so test assertions can inspect exactly what the
//! synchronizer did and in what order.
//!
//! Handles are allocated from a monotonically increasing counter and are
//! never reused, which makes leak and double-destroy checks trivial.
//!
//! # `fail_all` flag
//!
//! Construct with [`MockMapCanvas::failing`] to make every call return a
//! [`MapError::Provider`].  This exercises the error-handling paths of the
//! synchronizer without a broken provider.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use dispatch_core::{GeoPoint, RouteColor};

use crate::application::reconcile::{MapCanvas, MapError, MarkerStyle};
use crate::application::registry::OverlayHandle;

/// Record of one `create_marker` call.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedMarker {
    pub handle: OverlayHandle,
    pub position: GeoPoint,
    pub label: String,
    pub style: MarkerStyle,
}

/// Record of one `create_path` call.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedPath {
    pub handle: OverlayHandle,
    pub points: Vec<GeoPoint>,
    pub color: RouteColor,
}

/// A map canvas that records all calls without touching any provider.
#[derive(Debug, Default)]
pub struct MockMapCanvas {
    markers: Mutex<Vec<CreatedMarker>>,
    paths: Mutex<Vec<CreatedPath>>,
    removals: Mutex<Vec<OverlayHandle>>,
    pan_targets: Mutex<Vec<GeoPoint>>,
    next_handle: AtomicU64,
    fail_all: bool,
}

impl MockMapCanvas {
    /// Creates a recording canvas where every call succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a canvas where every call fails with a provider error.
    pub fn failing() -> Self {
        Self { fail_all: true, ..Self::default() }
    }

    fn allocate(&self) -> OverlayHandle {
        OverlayHandle(self.next_handle.fetch_add(1, Ordering::Relaxed))
    }

    fn check(&self) -> Result<(), MapError> {
        if self.fail_all {
            return Err(MapError::Provider("mock failure".into()));
        }
        Ok(())
    }

    // ── Inspection helpers for tests ──────────────────────────────────────────

    /// All markers ever created, in creation order.
    pub fn markers(&self) -> Vec<CreatedMarker> {
        self.markers.lock().unwrap().clone()
    }

    /// All paths ever created, in creation order.
    pub fn paths(&self) -> Vec<CreatedPath> {
        self.paths.lock().unwrap().clone()
    }

    /// All destroyed handles, in destruction order.
    pub fn removed(&self) -> Vec<OverlayHandle> {
        self.removals.lock().unwrap().clone()
    }

    /// All viewport pan targets, in call order.
    pub fn pans(&self) -> Vec<GeoPoint> {
        self.pan_targets.lock().unwrap().clone()
    }

    /// Handles that were created and never destroyed.
    pub fn live_handles(&self) -> Vec<OverlayHandle> {
        let removed = self.removals.lock().unwrap();
        let mut live: Vec<OverlayHandle> = Vec::new();
        live.extend(self.markers.lock().unwrap().iter().map(|m| m.handle));
        live.extend(self.paths.lock().unwrap().iter().map(|p| p.handle));
        live.retain(|handle| !removed.contains(handle));
        live
    }

    /// Total number of create/destroy operations issued so far.
    ///
    /// Pans are deliberately not counted: idempotence is defined over
    /// overlay creation and destruction.
    pub fn operation_count(&self) -> usize {
        self.markers.lock().unwrap().len()
            + self.paths.lock().unwrap().len()
            + self.removals.lock().unwrap().len()
    }
}

impl MapCanvas for MockMapCanvas {
    fn create_marker(
        &self,
        position: GeoPoint,
        label: &str,
        style: MarkerStyle,
    ) -> Result<OverlayHandle, MapError> {
        self.check()?;
        let handle = self.allocate();
        self.markers.lock().unwrap().push(CreatedMarker {
            handle,
            position,
            label: label.to_string(),
            style,
        });
        Ok(handle)
    }

    fn create_path(&self, points: &[GeoPoint], color: RouteColor) -> Result<OverlayHandle, MapError> {
        self.check()?;
        let handle = self.allocate();
        self.paths.lock().unwrap().push(CreatedPath {
            handle,
            points: points.to_vec(),
            color,
        });
        Ok(handle)
    }

    fn remove_overlay(&self, handle: OverlayHandle) -> Result<(), MapError> {
        self.check()?;
        self.removals.lock().unwrap().push(handle);
        Ok(())
    }

    fn pan_to(&self, position: GeoPoint) -> Result<(), MapError> {
        self.check()?;
        self.pan_targets.lock().unwrap().push(position);
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_are_unique_across_overlay_types() {
        let canvas = MockMapCanvas::new();
        let m = canvas
            .create_marker(GeoPoint::new(1.0, 2.0), "m", MarkerStyle::Depot)
            .unwrap();
        let p = canvas
            .create_path(&[GeoPoint::new(1.0, 2.0)], dispatch_core::ROUTE_PALETTE[0])
            .unwrap();
        assert_ne!(m, p);
    }

    #[test]
    fn test_live_handles_excludes_removed() {
        let canvas = MockMapCanvas::new();
        let a = canvas
            .create_marker(GeoPoint::new(1.0, 2.0), "a", MarkerStyle::Delivery)
            .unwrap();
        let b = canvas
            .create_marker(GeoPoint::new(3.0, 4.0), "b", MarkerStyle::Delivery)
            .unwrap();

        canvas.remove_overlay(a).unwrap();

        assert_eq!(canvas.live_handles(), vec![b]);
    }

    #[test]
    fn test_failing_canvas_rejects_every_call() {
        let canvas = MockMapCanvas::failing();
        assert!(canvas
            .create_marker(GeoPoint::new(0.0, 0.0), "x", MarkerStyle::Depot)
            .is_err());
        assert!(canvas.pan_to(GeoPoint::new(0.0, 0.0)).is_err());
        assert_eq!(canvas.operation_count(), 0);
    }
}
