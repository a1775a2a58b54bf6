//! Application layer use cases for the client application.
//!
//! # What use cases does the client have?
//!
//! - **`state`** – The single `DomainStateStore` holding depot, deliveries,
//!   and the current route plan.  Every mutation returns a `StateChange`
//!   that the caller must feed to the synchronizer; depot and delivery
//!   mutations also invalidate routes, because the node-index space a route
//!   references is defined by the depot and the deliveries sequence.
//!
//! - **`registry`** – The `OverlayRegistry` owning all live map overlay
//!   handles, keyed by entity identity.  At most one overlay per entity,
//!   ever; a handle leaves the registry before its replacement is created.
//!
//! - **`reconcile`** – The `MapCanvas` port and the `OverlaySynchronizer`
//!   that diffs desired overlay state against the registry and issues
//!   create/destroy calls on the map.
//!
//! - **`commands`** – Operator-facing use cases (`set_depot`,
//!   `add_delivery`, `optimize_routes`, startup resync) over the
//!   `BackendApi` and `Geocoder` ports.

pub mod commands;
pub mod reconcile;
pub mod registry;
pub mod state;
