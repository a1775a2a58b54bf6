//! Domain layer: pure business logic with no I/O dependencies.
//!
//! - **`geo`** – Geographic entities: `GeoPoint`, `Depot`, `Delivery`.
//! - **`route`** – The optimizer's answer (`Route`, `RoutePlan`) and the
//!   decoder that maps node indices back to coordinates.
//! - **`palette`** – The fixed ordered color palette for route polylines.

pub mod geo;
pub mod palette;
pub mod route;
