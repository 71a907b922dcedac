//! Business logic services

pub mod books;

use std::sync::Arc;

use crate::{config::PaginationConfig, repository::BookStore};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: books::BookService,
}

impl Services {
    /// Create all services on top of the given record store
    pub fn new(store: Arc<dyn BookStore>, pagination: PaginationConfig) -> Self {
        Self {
            books: books::BookService::new(store, pagination),
        }
    }
}
