//! Bookshelf - Book Catalog Management
//!
//! A REST JSON API for managing a catalog of books: create, list with
//! filter and pagination, update and delete.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Build the state on top of an already constructed record store
    pub fn new(config: &AppConfig, store: Arc<dyn repository::BookStore>) -> Self {
        let services = services::Services::new(store, config.pagination.clone());
        Self {
            services: Arc::new(services),
        }
    }
}
