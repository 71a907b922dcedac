//! In-process books repository.
//!
//! Used for local development and the HTTP test-suite. All state sits behind
//! a single lock, which is what makes the isbn check-then-write atomic.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{duplicate_isbn, page_offset, BookStore, StoreResult};
use crate::{
    error::StoreError,
    models::book::{Book, BookFields},
};

#[derive(Default)]
struct Shelf {
    last_id: i32,
    books: BTreeMap<i32, Book>,
}

impl Shelf {
    fn isbn_taken(&self, isbn: &str, except: Option<i32>) -> bool {
        self.books
            .values()
            .any(|b| b.isbn == isbn && Some(b.id) != except)
    }
}

#[derive(Default)]
pub struct MemoryBooksRepository {
    shelf: Mutex<Shelf>,
}

impl MemoryBooksRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn book_matches(book: &Book, needle: &str) -> bool {
    needle.is_empty()
        || [&book.title, &book.author, &book.isbn]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
}

#[async_trait]
impl BookStore for MemoryBooksRepository {
    async fn insert(&self, fields: &BookFields) -> StoreResult<Book> {
        let mut shelf = self.shelf.lock().await;
        if shelf.isbn_taken(&fields.isbn, None) {
            return Err(duplicate_isbn(&fields.isbn));
        }

        shelf.last_id += 1;
        let book = Book {
            id: shelf.last_id,
            title: fields.title.clone(),
            author: fields.author.clone(),
            isbn: fields.isbn.clone(),
        };
        shelf.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn get_by_id(&self, id: i32) -> StoreResult<Option<Book>> {
        Ok(self.shelf.lock().await.books.get(&id).cloned())
    }

    async fn replace(&self, id: i32, fields: &BookFields) -> StoreResult<Book> {
        let mut shelf = self.shelf.lock().await;
        if !shelf.books.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }
        if shelf.isbn_taken(&fields.isbn, Some(id)) {
            return Err(duplicate_isbn(&fields.isbn));
        }

        let book = Book {
            id,
            title: fields.title.clone(),
            author: fields.author.clone(),
            isbn: fields.isbn.clone(),
        };
        shelf.books.insert(id, book.clone());
        Ok(book)
    }

    async fn delete(&self, id: i32) -> StoreResult<()> {
        self.shelf
            .lock()
            .await
            .books
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn scan(
        &self,
        filter: &str,
        page: i64,
        per_page: i64,
    ) -> StoreResult<(Vec<Book>, i64)> {
        let needle = filter.to_lowercase();
        let shelf = self.shelf.lock().await;
        let matching: Vec<&Book> = shelf
            .books
            .values()
            .filter(|b| book_matches(b, &needle))
            .collect();

        let offset = usize::try_from(page_offset(page, per_page)).unwrap_or(usize::MAX);
        let take = usize::try_from(per_page).unwrap_or(0);
        let books = matching.iter().skip(offset).take(take).map(|b| (*b).clone()).collect();

        Ok((books, matching.len() as i64))
    }
}
