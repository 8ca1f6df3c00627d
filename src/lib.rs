pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use services::{group_ids::GroupIdAllocator, shifts::ShiftStore};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ShiftStore>,
    pub group_ids: Arc<dyn GroupIdAllocator>,
}
