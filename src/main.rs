mod animation;
mod blackboard;
mod bus;
mod engine;
mod graphics;
mod persist;
mod planner;
mod settings;
mod store;
mod tracking;

use std::sync::Arc;

use macroquad::prelude::*;
use parking_lot::Mutex;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::engine::NavigationEngine;
use crate::graphics::window_conf;
use crate::persist::JsonFileStore;
use crate::planner::AisleOrderPlanner;
use crate::settings::Settings;
use crate::tracking::{LocationSource, SimulatedWalkSource};

#[macroquad::main(window_conf)]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    info!("Storepilot starting. Setting up Tokio runtime and navigation engine...");

    let settings = Settings::load().unwrap_or_else(|e| {
        warn!("Using built-in store configuration: {}", e);
        Settings::default()
    });

    let tokio_rt = tokio::runtime::Runtime::new().expect("tokio runtime");

    let location: Option<Box<dyn LocationSource>> = match settings.geo_bounds() {
        Ok(bounds) => Some(Box::new(SimulatedWalkSource::new(bounds))),
        Err(e) => {
            warn!("Invalid geofence, live tracking disabled: {}", e);
            None
        }
    };

    let mut engine = match NavigationEngine::new(
        settings.clone(),
        Box::new(AisleOrderPlanner::new()),
        Box::new(JsonFileStore::new(&settings.store.saved_list_path)),
        location,
        tokio_rt.handle().clone(),
    ) {
        Ok(engine) => engine,
        Err(e) => {
            error!("Failed to initialize navigation engine: {:?}", e);
            return;
        }
    };

    if let Err(e) = engine.load_catalog() {
        warn!(error = %e, "product catalog unavailable");
    }

    let bb = engine.blackboard();
    let position_rx = engine.positions().subscribe();
    let engine = Arc::new(Mutex::new(engine));

    graphics::run(engine, bb, position_rx).await;
}
