//! Catalog Data Types
//!
//! Request parameters, rows read back from the store, and the response documents
//! returned by `GET /v1/books`.

use serde::{Deserialize, Serialize};

/// Raw query-string parameters of the listing endpoint.
///
/// Every field is kept as an unparsed string; normalization happens in
/// [`super::filters`] so that bad input degrades to defaults instead of a rejection.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BookListParams {
    pub gutenberg_id: Option<String>,
    pub language: Option<String>,
    pub mime_type: Option<String>,
    pub topic: Option<String>,
    pub author: Option<String>,
    pub title: Option<String>,
    pub page: Option<String>,
}

impl BookListParams {
    /// Collects decoded query pairs. A repeated key keeps its last value; unknown keys
    /// are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "gutenberg_id" => &mut params.gutenberg_id,
                "language" => &mut params.language,
                "mime_type" => &mut params.mime_type,
                "topic" => &mut params.topic,
                "author" => &mut params.author,
                "title" => &mut params.title,
                "page" => &mut params.page,
                _ => continue,
            };
            *slot = Some(value);
        }
        params
    }
}

/// A `books_book` row.
#[derive(Debug, Clone, PartialEq)]
pub struct BookRecord {
    pub id: i64,
    pub gutenberg_id: i64,
    pub title: Option<String>,
    pub download_count: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthorRecord {
    pub name: String,
    pub birth_year: Option<i64>,
    pub death_year: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormatRecord {
    pub mime_type: String,
    pub url: String,
}

/// Nested collections of one book, each in load order and not yet deduplicated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookRelations {
    pub authors: Vec<AuthorRecord>,
    pub formats: Vec<FormatRecord>,
    pub languages: Vec<String>,
    pub subjects: Vec<String>,
    pub bookshelves: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BooksResponse {
    pub total_count: u64,
    pub books: Vec<BookDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookDocument {
    pub title: Option<String>,
    pub authors: Vec<AuthorDocument>,
    pub genre: Option<String>,
    pub languages: Vec<String>,
    pub subjects: Vec<String>,
    pub bookshelves: Vec<String>,
    pub links: Vec<LinkDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorDocument {
    pub name: String,
    pub birth_year: Option<i64>,
    pub death_year: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkDocument {
    pub mime_type: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub books: Option<u64>,
}
