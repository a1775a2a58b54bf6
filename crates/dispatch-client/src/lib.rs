//! dispatch-client library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does dispatch-client do? (for beginners)
//!
//! The client is the operator-facing half of a vehicle-routing system.  The
//! backend owns the authoritative state (depot, delivery stops) and the
//! solver; the client's real job is *reactive synchronization*: keeping a
//! set of map overlays — one depot marker, one marker per delivery, one
//! colored polyline per vehicle route — in exact, leak-free correspondence
//! with domain state that changes asynchronously from network responses and
//! operator commands.
//!
//! The client application:
//!
//! 1. Fetches the depot and the delivery list from the backend at startup,
//!    so a fresh session always reflects server-held state.
//! 2. Geocodes a depot address through the geocoding provider and stores the
//!    result on the backend before applying it locally.
//! 3. Registers delivery stops (the backend geocodes those itself) and
//!    re-fetches the authoritative list afterwards.
//! 4. Requests a multi-vehicle optimization and decodes each returned route
//!    — an abstract sequence of node indices — back into geography.
//! 5. Reconciles the map overlay set after every state change, replacing
//!    exactly what changed and nothing when nothing did.

/// Application layer: domain state, overlay bookkeeping, and use cases.
pub mod application;

/// Infrastructure layer: HTTP adapters, the map canvas adapter, and config.
pub mod infrastructure;
