//! PostgreSQL books repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::{duplicate_isbn, page_offset, BookStore, StoreResult};
use crate::{
    error::StoreError,
    models::book::{Book, BookFields},
};

const MATCH_FILTER: &str = "($1 = '' OR title ILIKE $2 OR author ILIKE $2 OR isbn ILIKE $2)";

/// Escape LIKE wildcards so the filter is matched as a literal substring.
fn like_pattern(filter: &str) -> String {
    let mut pattern = String::with_capacity(filter.len() + 2);
    pattern.push('%');
    for c in filter.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn map_write_error(err: sqlx::Error, isbn: &str) -> StoreError {
    let unique_violation = err
        .as_database_error()
        .map_or(false, |db| db.is_unique_violation());
    if unique_violation {
        duplicate_isbn(isbn)
    } else {
        StoreError::Database(err)
    }
}

#[derive(Clone)]
pub struct PgBooksRepository {
    pool: Pool<Postgres>,
}

impl PgBooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for PgBooksRepository {
    async fn insert(&self, fields: &BookFields) -> StoreResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, isbn)
            VALUES ($1, $2, $3)
            RETURNING id, title, author, isbn
            "#,
        )
        .bind(&fields.title)
        .bind(&fields.author)
        .bind(&fields.isbn)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &fields.isbn))
    }

    async fn get_by_id(&self, id: i32) -> StoreResult<Option<Book>> {
        let book =
            sqlx::query_as::<_, Book>("SELECT id, title, author, isbn FROM books WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(book)
    }

    async fn replace(&self, id: i32, fields: &BookFields) -> StoreResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET title = $1, author = $2, isbn = $3
            WHERE id = $4
            RETURNING id, title, author, isbn
            "#,
        )
        .bind(&fields.title)
        .bind(&fields.author)
        .bind(&fields.isbn)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &fields.isbn))?
        .ok_or(StoreError::NotFound(id))
    }

    async fn delete(&self, id: i32) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn scan(
        &self,
        filter: &str,
        page: i64,
        per_page: i64,
    ) -> StoreResult<(Vec<Book>, i64)> {
        let pattern = like_pattern(filter);

        let count_query = format!("SELECT COUNT(*) FROM books WHERE {}", MATCH_FILTER);
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(filter)
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await?;

        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT id, title, author, isbn FROM books WHERE {} ORDER BY id LIMIT $3 OFFSET $4",
            MATCH_FILTER
        ))
        .bind(filter)
        .bind(&pattern)
        .bind(per_page)
        .bind(page_offset(page, per_page))
        .fetch_all(&self.pool)
        .await?;

        Ok((books, total))
    }
}
