//! Book catalog service

use std::sync::Arc;

use validator::Validate;

use crate::{
    config::PaginationConfig,
    error::{AppError, AppResult},
    models::book::{Book, BookFields, BookInput, BookList, BookQuery, Pagination},
    repository::BookStore,
};

const FIELDS_REQUIRED: &str = "All fields are required";
const BOOK_NOT_FOUND: &str = "Book not found";

#[derive(Clone)]
pub struct BookService {
    store: Arc<dyn BookStore>,
    pagination: PaginationConfig,
}

impl BookService {
    pub fn new(store: Arc<dyn BookStore>, pagination: PaginationConfig) -> Self {
        Self { store, pagination }
    }

    /// Validate a request body into a full set of fields
    fn validated_fields(input: BookInput) -> AppResult<BookFields> {
        if let Err(errors) = input.validate() {
            tracing::debug!("Rejected book input: {}", errors);
            return Err(AppError::Validation(FIELDS_REQUIRED.to_string()));
        }
        input
            .into_fields()
            .ok_or_else(|| AppError::Validation(FIELDS_REQUIRED.to_string()))
    }

    /// Resolve textual page/limit values to `(page, per_page)`.
    ///
    /// Unparseable or non-positive values fall back to the defaults; `limit`
    /// is capped at `max_per_page`. Pages past the end are left as-is and
    /// simply yield an empty slice.
    fn page_bounds(&self, query: &BookQuery) -> (i64, i64) {
        let parse = |v: &Option<String>| {
            v.as_deref()
                .and_then(|s| s.trim().parse::<i64>().ok())
                .filter(|n| *n >= 1)
        };

        let page = parse(&query.page).unwrap_or(1);
        let per_page = parse(&query.limit)
            .unwrap_or(self.pagination.default_per_page)
            .min(self.pagination.max_per_page.max(1));
        (page, per_page)
    }

    pub async fn create_book(&self, input: BookInput) -> AppResult<Book> {
        let fields = Self::validated_fields(input)?;
        let book = self
            .store
            .insert(&fields)
            .await
            .map_err(|e| AppError::from_store("Error adding book", e))?;
        tracing::info!("Book {} created (isbn {})", book.id, book.isbn);
        Ok(book)
    }

    /// List books matching the query's filter, one page at a time
    pub async fn list_books(&self, query: &BookQuery) -> AppResult<BookList> {
        let (page, per_page) = self.page_bounds(query);
        let filter = query.filter.as_deref().unwrap_or("");

        let (books, total) = self
            .store
            .scan(filter, page, per_page)
            .await
            .map_err(|e| AppError::from_store("Error fetching books", e))?;

        Ok(BookList {
            books,
            pagination: Pagination::new(page, per_page, total),
        })
    }

    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.store
            .get_by_id(id)
            .await
            .map_err(|e| AppError::from_store("Error fetching book", e))?
            .ok_or_else(|| AppError::NotFound(BOOK_NOT_FOUND.to_string()))
    }

    /// Replace every field of an existing book
    pub async fn update_book(&self, id: i32, input: BookInput) -> AppResult<Book> {
        let fields = Self::validated_fields(input)?;

        let existing = self
            .store
            .get_by_id(id)
            .await
            .map_err(|e| AppError::from_store("Error updating book", e))?;
        if existing.is_none() {
            return Err(AppError::NotFound(BOOK_NOT_FOUND.to_string()));
        }

        let book = self
            .store
            .replace(id, &fields)
            .await
            .map_err(|e| AppError::from_store("Error updating book", e))?;
        tracing::info!("Book {} updated", id);
        Ok(book)
    }

    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        let existing = self
            .store
            .get_by_id(id)
            .await
            .map_err(|e| AppError::from_store("Error deleting book", e))?;
        if existing.is_none() {
            return Err(AppError::NotFound(BOOK_NOT_FOUND.to_string()));
        }

        self.store
            .delete(id)
            .await
            .map_err(|e| AppError::from_store("Error deleting book", e))?;
        tracing::info!("Book {} deleted", id);
        Ok(())
    }
}
