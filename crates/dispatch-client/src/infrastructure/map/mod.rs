//! Map canvas adapters.
//!
//! The application layer talks to the map exclusively through the
//! [`MapCanvas`] port.  A production build would plug in a bridge to a real
//! map provider (the widget hands itself to the adapter once its load
//! callback fires); this crate ships the in-memory [`mock::MockMapCanvas`]
//! used by the tests and by the headless binary.
//!
//! [`MapCanvas`]: crate::application::reconcile::MapCanvas

pub mod mock;
