//! Book model

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Book record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    /// Unique across the catalog
    pub isbn: String,
}

/// Create / update book request.
///
/// Fields are optional at the wire level so that a missing field is reported
/// as a validation failure instead of a body-parse failure.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct BookInput {
    #[validate(
        required(message = "title is required"),
        length(min = 1, message = "title must not be empty")
    )]
    pub title: Option<String>,
    #[validate(
        required(message = "author is required"),
        length(min = 1, message = "author must not be empty")
    )]
    pub author: Option<String>,
    #[validate(
        required(message = "isbn is required"),
        length(min = 1, message = "isbn must not be empty")
    )]
    pub isbn: Option<String>,
}

impl BookInput {
    pub fn new(title: &str, author: &str, isbn: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            author: Some(author.to_string()),
            isbn: Some(isbn.to_string()),
        }
    }

    /// Consume a validated input. Returns `None` if any field is absent.
    pub fn into_fields(self) -> Option<BookFields> {
        Some(BookFields {
            title: self.title?,
            author: self.author?,
            isbn: self.isbn?,
        })
    }
}

/// Complete set of book fields, as handed to the record store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub isbn: String,
}

/// Book list query parameters.
///
/// `page` and `limit` are kept textual and coerced by the service.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Substring matched against title, author and isbn
    pub filter: Option<String>,
    /// Page number, 1-indexed (default: 1)
    pub page: Option<String>,
    /// Books per page (default: 10)
    pub limit: Option<String>,
}

impl BookQuery {
    /// Build a query from raw query-string pairs.
    ///
    /// A parameter given more than once is ambiguous and treated as absent.
    /// Unknown parameters are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut seen: HashMap<String, Option<String>> = HashMap::new();
        for (key, value) in pairs {
            seen.entry(key).and_modify(|v| *v = None).or_insert(Some(value));
        }
        let mut take = |key: &str| seen.remove(key).flatten();

        Self {
            filter: take("filter"),
            page: take("page"),
            limit: take("limit"),
        }
    }
}

/// Pagination block of a book listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_books: i64,
    pub per_page: i64,
}

impl Pagination {
    pub fn new(current_page: i64, per_page: i64, total_books: i64) -> Self {
        // Ceiling division; an empty result set has zero pages.
        let total_pages = if per_page > 0 {
            (total_books + per_page - 1) / per_page
        } else {
            0
        };
        Self {
            current_page,
            total_pages,
            total_books,
            per_page,
        }
    }
}

/// Paginated book listing
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookList {
    pub books: Vec<Book>,
    pub pagination: Pagination,
}

/// Confirmation returned by the delete endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub message: String,
}
