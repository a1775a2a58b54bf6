//! Backend wire contract.
//!
//! Typed request/response bodies for the backend REST endpoints, shared by
//! the HTTP adapter and the tests so there is exactly one definition of each
//! JSON shape.

pub mod messages;
