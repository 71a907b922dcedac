//! Repository layer: record store backends for books

pub mod books;
pub mod memory;

use async_trait::async_trait;

use crate::{
    error::StoreError,
    models::book::{Book, BookFields},
};

pub use books::PgBooksRepository;
pub use memory::MemoryBooksRepository;

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistent storage of book records.
///
/// Implementations enforce isbn uniqueness themselves, so concurrent writers
/// can never both succeed with the same isbn.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Persist a new book and return it with its assigned id.
    async fn insert(&self, fields: &BookFields) -> StoreResult<Book>;

    async fn get_by_id(&self, id: i32) -> StoreResult<Option<Book>>;

    /// Overwrite all fields of an existing book.
    async fn replace(&self, id: i32, fields: &BookFields) -> StoreResult<Book>;

    async fn delete(&self, id: i32) -> StoreResult<()>;

    /// Return one page of books matching `filter` (all books when empty),
    /// ordered by id, together with the number of matches before slicing.
    /// `page` is 1-indexed.
    async fn scan(
        &self,
        filter: &str,
        page: i64,
        per_page: i64,
    ) -> StoreResult<(Vec<Book>, i64)>;
}

/// Offset of the first row of a 1-indexed page
pub(crate) fn page_offset(page: i64, per_page: i64) -> i64 {
    (page.max(1) - 1).saturating_mul(per_page)
}

pub(crate) fn duplicate_isbn(isbn: &str) -> StoreError {
    StoreError::ConstraintViolation(format!("A book with ISBN {} already exists", isbn))
}
