//! Application state shared across routes

use std::sync::Arc;

use crate::config::Config;
use crate::game::{MapCatalog, TickMode};
use crate::world::WorldHandle;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Immutable map topology, read without going through the world executor
    pub maps: Arc<MapCatalog>,
    pub world: WorldHandle,
    pub tick_mode: TickMode,
}

impl AppState {
    pub fn new(config: Config, maps: MapCatalog, world: WorldHandle, tick_mode: TickMode) -> Self {
        Self {
            config: Arc::new(config),
            maps: Arc::new(maps),
            world,
            tick_mode,
        }
    }
}
