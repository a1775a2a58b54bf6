//! The domain state store: depot, deliveries, and the current route plan.
//!
//! One instance exists per running session.  All mutation happens through
//! the methods here, each of which returns the [`StateChange`] the caller
//! must hand to the overlay synchronizer.  Nothing is persisted locally —
//! a fresh session re-fetches depot and deliveries from the backend instead
//! of trusting any cache.
//!
//! # Route invalidation
//!
//! A route is a sequence of node indices, and the meaning of index `i` is
//! defined by the depot (index 0) and the deliveries sequence (`i - 1`).
//! Changing either changes the index space, so `set_depot`,
//! `append_delivery`, and `replace_deliveries` all clear the stored routes
//! themselves.  The invalidation is part of the mutation, not a side effect
//! buried in overlay rendering: the returned [`StateChange`] tells the
//! synchronizer that route overlays must be re-reconciled too.

use dispatch_core::{Delivery, Depot, RoutePlan};
use tracing::debug;

/// Which slice of domain state a mutation touched.
///
/// `Depot` and `Deliveries` imply that routes were invalidated as well;
/// the synchronizer reconciles route overlays for every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    /// The depot was set or replaced (routes cleared).
    Depot,
    /// The deliveries sequence changed (routes cleared).
    Deliveries,
    /// The route plan was replaced or cleared.
    Routes,
}

/// Holds the current depot, the ordered deliveries list, and the current
/// route plan.
#[derive(Debug, Default)]
pub struct DomainStateStore {
    depot: Option<Depot>,
    deliveries: Vec<Delivery>,
    routes: RoutePlan,
}

impl DomainStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Read accessors ────────────────────────────────────────────────────────

    pub fn depot(&self) -> Option<&Depot> {
        self.depot.as_ref()
    }

    /// The deliveries sequence, in backend order.  A delivery's position
    /// here *is* its identity and its node index minus one.
    pub fn deliveries(&self) -> &[Delivery] {
        &self.deliveries
    }

    pub fn routes(&self) -> &RoutePlan {
        &self.routes
    }

    // ── Mutations ─────────────────────────────────────────────────────────────

    /// Installs or replaces the depot.  Clears any stored routes, since
    /// their index space referenced the previous reference point.
    #[must_use = "feed the StateChange to the overlay synchronizer"]
    pub fn set_depot(&mut self, depot: Depot) -> StateChange {
        debug!(address = %depot.address, "depot set; routes invalidated");
        self.depot = Some(depot);
        self.routes.clear();
        StateChange::Depot
    }

    /// Appends one delivery to the end of the sequence.  Clears routes.
    #[must_use = "feed the StateChange to the overlay synchronizer"]
    pub fn append_delivery(&mut self, delivery: Delivery) -> StateChange {
        debug!(address = %delivery.address, count = self.deliveries.len() + 1,
               "delivery appended; routes invalidated");
        self.deliveries.push(delivery);
        self.routes.clear();
        StateChange::Deliveries
    }

    /// Replaces the whole deliveries sequence with the backend's
    /// authoritative ordering.  Clears routes.
    #[must_use = "feed the StateChange to the overlay synchronizer"]
    pub fn replace_deliveries(&mut self, deliveries: Vec<Delivery>) -> StateChange {
        debug!(count = deliveries.len(), "deliveries replaced; routes invalidated");
        self.deliveries = deliveries;
        self.routes.clear();
        StateChange::Deliveries
    }

    /// Installs a freshly solved route plan.
    #[must_use = "feed the StateChange to the overlay synchronizer"]
    pub fn replace_routes(&mut self, routes: RoutePlan) -> StateChange {
        debug!(vehicles = routes.len(), "route plan replaced");
        self.routes = routes;
        StateChange::Routes
    }

    /// Drops the current route plan.
    #[must_use = "feed the StateChange to the overlay synchronizer"]
    pub fn clear_routes(&mut self) -> StateChange {
        self.routes.clear();
        StateChange::Routes
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
