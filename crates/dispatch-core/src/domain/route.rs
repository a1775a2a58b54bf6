//! Optimizer output and the node-index decoder.
//!
//! The backend solver answers an optimize request with one route per vehicle
//! slot.  A route is an ordered sequence of abstract node indices: index `0`
//! is the depot and index `i > 0` is the delivery at position `i - 1` in the
//! deliveries sequence *as it stood when the solve ran*.  Because the
//! deliveries sequence can change while a response is in flight, decoding is
//! deliberately tolerant — a reference to an entity that no longer exists is
//! skipped, never an error.

use crate::domain::geo::{Delivery, Depot, GeoPoint};

/// An abstract node index as returned by the optimizer.
///
/// `0` denotes the depot; `i > 0` denotes `deliveries[i - 1]`.
pub type NodeIndex = u32;

/// One vehicle's route: an ordered sequence of node indices.
///
/// May be empty (an unused vehicle slot).
pub type Route = Vec<NodeIndex>;

/// The optimizer's full answer: one [`Route`] per vehicle slot requested.
pub type RoutePlan = Vec<Route>;

/// Decodes a route into a concrete geographic path.
///
/// For each index in `route`, in order:
/// - `0` emits the depot's coordinates if a depot is present, otherwise the
///   waypoint is dropped;
/// - `i > 0` emits `deliveries[i - 1]`'s coordinates if that position
///   exists, otherwise the waypoint is dropped.
///
/// Dropped waypoints shorten the path silently; out-of-range and stale
/// indices never fail.  Output preserves input order, performs no
/// deduplication, and may be empty.
pub fn decode_route(route: &[NodeIndex], depot: Option<&Depot>, deliveries: &[Delivery]) -> Vec<GeoPoint> {
    route
        .iter()
        .filter_map(|&node| match node {
            0 => depot.map(Depot::position),
            i => deliveries.get(i as usize - 1).map(Delivery::position),
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
