//! Infrastructure layer for the client application.
//!
//! Contains the outward-facing adapters: the backend REST client, the
//! geocoding provider client, the map canvas adapter, and configuration
//! persistence.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `dispatch_core`, but MUST NOT be imported by the `application` layer.
//!
//! # Sub-modules
//!
//! - **`backend`** – `reqwest` client for the backend REST endpoints,
//!   implementing the `BackendApi` port.
//!
//! - **`geocode`** – `reqwest` client for the geocoding provider,
//!   implementing the `Geocoder` port.  The provider's response shapes live
//!   here; nothing provider-specific leaks into the application layer.
//!
//! - **`map`** – Map canvas adapters behind the `MapCanvas` port.  Ships the
//!   in-memory recording canvas; a real provider bridge slots in here.
//!
//! - **`config`** – TOML configuration file handling.

pub mod backend;
pub mod config;
pub mod geocode;
pub mod map;
