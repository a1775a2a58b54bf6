//! The fixed route color palette.
//!
//! Each vehicle's polyline gets a color from a fixed ordered palette so a
//! plan renders the same way every time: vehicle `k` always gets
//! `ROUTE_PALETTE[k mod 10]`, independent of any prior overlay state.

use serde::Serialize;

/// A stroke color for a route polyline, as a `#RRGGBB` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteColor(pub &'static str);

impl RouteColor {
    /// The hex string, e.g. `"#FF0000"`.
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

/// The fixed ordered palette, ten entries.
pub const ROUTE_PALETTE: [RouteColor; 10] = [
    RouteColor("#FF0000"),
    RouteColor("#00FF00"),
    RouteColor("#0000FF"),
    RouteColor("#FFA500"),
    RouteColor("#800080"),
    RouteColor("#FFFF00"),
    RouteColor("#00FFFF"),
    RouteColor("#FFC0CB"),
    RouteColor("#808080"),
    RouteColor("#8B0000"),
];

/// Deterministic color assignment for the vehicle at plan position `k`.
pub fn color_for_vehicle(k: usize) -> RouteColor {
    ROUTE_PALETTE[k % ROUTE_PALETTE.len()]
}
