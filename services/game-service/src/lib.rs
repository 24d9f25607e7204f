pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod routes;
pub mod service;
pub mod store;
pub mod types;
pub mod validation;

use std::sync::Arc;

use crate::service::{GameService, GenreService, PlatformService};
use crate::store::Store;

pub use crate::error::GameServiceError;
pub use crate::routes::create_routes;

/// Shared handler state. Every service holds the same store handle.
#[derive(Clone)]
pub struct AppState {
    pub games: GameService,
    pub genres: GenreService,
    pub platforms: PlatformService,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            games: GameService::new(store.clone()),
            genres: GenreService::new(store.clone()),
            platforms: PlatformService::new(store),
        }
    }
}
