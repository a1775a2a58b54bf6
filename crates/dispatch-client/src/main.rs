//! Dispatch client application entry point.
//!
//! Wires together the backend client, the geocoding client, the map canvas,
//! and the planning session, then runs a line-oriented command loop on
//! stdin.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config()             -- TOML config with serde defaults
//!  └─ PlannerSession::new()     -- ports wired: backend, geocoder, canvas
//!  └─ resync depot/deliveries   -- server-held state restored first
//!  └─ command dispatch loop
//!       ├─ depot <address>        -> PlannerSession::set_depot
//!       ├─ add [demand] <address> -> PlannerSession::add_delivery
//!       ├─ plan                   -> PlannerSession::optimize_routes
//!       └─ status                 -> print state + overlay counts
//! ```
//!
//! # Map canvas
//!
//! The `MockMapCanvas` used here records overlay operations in memory rather
//! than driving a real map widget.  In a production build it is replaced by
//! a bridge to the embedded map provider, constructed once the widget's
//! load callback has fired.

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use dispatch_client::application::commands::PlannerSession;
use dispatch_client::application::reconcile::MapCanvas;
use dispatch_client::application::registry::OverlayKind;
use dispatch_client::infrastructure::{
    backend::HttpBackend, config::load_config, geocode::HttpGeocoder, map::mock::MockMapCanvas,
};
use dispatch_core::GeoPoint;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config().context("loading configuration")?;

    // Initialise structured logging; RUST_LOG wins over the config file.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.client.log_level)),
        )
        .init();

    info!("Dispatch client starting");

    // ── Port wiring ───────────────────────────────────────────────────────────
    let backend = Arc::new(HttpBackend::new(&config.backend.base_url));
    let geocoder = Arc::new(HttpGeocoder::new(
        &config.geocoding.endpoint,
        &config.geocoding.api_key,
    ));
    let canvas = Arc::new(MockMapCanvas::new());
    // The viewport starts at the configured default center until a depot
    // exists to follow.
    canvas.pan_to(GeoPoint::new(
        config.map.default_center_lat,
        config.map.default_center_lng,
    ))?;

    let mut session = PlannerSession::new(
        backend,
        geocoder,
        Arc::clone(&canvas) as Arc<dyn MapCanvas>,
        config.planner.num_vehicles,
    );

    // ── Startup resync ────────────────────────────────────────────────────────
    // A fresh session trusts the backend, never a local cache.  A failure
    // here is reported and the session starts empty for that slice.
    if let Err(e) = session.resync_depot().await {
        warn!("could not restore depot from backend: {e}");
    }
    if let Err(e) = session.resync_deliveries().await {
        warn!("could not restore deliveries from backend: {e}");
    }

    // ── Command dispatch loop ─────────────────────────────────────────────────
    println!("Dispatch route planner. Commands: depot <address> | add [demand] <address> | plan | status | quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "depot" => match session.set_depot(rest).await {
                Ok(()) => println!("depot set: {rest}"),
                Err(e) => println!("error: {e}"),
            },

            "add" => {
                // `add 3 5 Oak Ave` reads a leading demand quantity;
                // `add 5th Avenue Bakery` defaults the demand to 1.
                let (demand, address) = match rest.split_once(char::is_whitespace) {
                    Some((first, remainder)) => match first.parse::<u32>() {
                        Ok(demand) => (demand, remainder.trim()),
                        Err(_) => (1, rest),
                    },
                    None => (1, rest),
                };
                match session.add_delivery(address, demand).await {
                    Ok(()) => println!(
                        "delivery added ({} stop{})",
                        session.store().deliveries().len(),
                        if session.store().deliveries().len() == 1 { "" } else { "s" }
                    ),
                    Err(e) => println!("error: {e}"),
                }
            }

            "plan" => match session.optimize_routes().await {
                Ok(()) => {
                    let drawn = session.synchronizer().registry().count_of_kind(OverlayKind::Route);
                    println!(
                        "optimized: {} vehicle slot(s), {} route(s) drawn",
                        session.store().routes().len(),
                        drawn
                    );
                }
                Err(e) => println!("error: {e}"),
            },

            "status" => {
                let store = session.store();
                let registry = session.synchronizer().registry();
                match store.depot() {
                    Some(depot) => println!("depot: {} ({}, {})", depot.address, depot.latitude, depot.longitude),
                    None => println!("depot: (not set)"),
                }
                println!("deliveries: {}", store.deliveries().len());
                for (i, delivery) in store.deliveries().iter().enumerate() {
                    println!("  {}. {} (demand {})", i + 1, delivery.address, delivery.demand);
                }
                println!(
                    "overlays: depot={} deliveries={} routes={}",
                    registry.count_of_kind(OverlayKind::Depot),
                    registry.count_of_kind(OverlayKind::Delivery),
                    registry.count_of_kind(OverlayKind::Route),
                );
            }

            "quit" | "exit" => break,

            other => println!("unknown command: {other}"),
        }
    }

    info!("Dispatch client stopped");
    Ok(())
}
