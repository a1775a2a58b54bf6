//! # dispatch-core
//!
//! Shared library for the Dispatch delivery-route client containing the
//! domain entities, the pure route decoder, and the backend wire contract.
//!
//! This crate is used by the client application and by its integration tests.
//! It has zero dependencies on network sockets, map providers, or the async
//! runtime.
//!
//! # Architecture overview (for beginners)
//!
//! Dispatch is a client for a vehicle-routing backend: an operator places a
//! depot, registers delivery stops with demand quantities, and asks the
//! backend to split the stops across a fleet of vehicles.  The backend's
//! answer is abstract — each route is just an ordered list of *node indices*
//! — and this crate knows how to turn that answer back into geography.
//!
//! This crate (`dispatch-core`) defines:
//!
//! - **`domain`** – Pure business logic.  The entities (`Depot`, `Delivery`),
//!   the node-index decoding rules (`decode_route`), and the fixed route
//!   color palette.  No I/O anywhere.
//!
//! - **`protocol`** – The JSON shapes exchanged with the backend REST
//!   endpoints.  Typed request/response structs so the HTTP adapter and the
//!   tests agree on exactly one contract.

// Declare the two top-level modules.  Rust will look for each in a
// subdirectory with the same name (e.g., src/domain/mod.rs).
pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `dispatch_core::Depot` instead of `dispatch_core::domain::geo::Depot`.
pub use domain::geo::{Delivery, Depot, DomainError, GeoPoint};
pub use domain::palette::{color_for_vehicle, RouteColor, ROUTE_PALETTE};
pub use domain::route::{decode_route, NodeIndex, Route, RoutePlan};
