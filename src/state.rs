//! Shared application state for all routes. The store is injected, never global.

use crate::config::ServerConfig;
use crate::store::EntityStore;
use std::sync::{Arc, RwLock};

#[derive(Clone)]
pub struct AppState {
    /// Each handler takes the lock once, so a mutation is atomic per request.
    pub store: Arc<RwLock<EntityStore>>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(store: EntityStore, config: ServerConfig) -> Self {
        AppState {
            store: Arc::new(RwLock::new(store)),
            config: Arc::new(config),
        }
    }
}
