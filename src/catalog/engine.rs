use super::assembler::assemble;
use super::filters::{page_number, BookFilters};
use super::pager::fetch_page;
use super::predicate::build_predicate;
use super::types::{BookListParams, BooksResponse};
use anyhow::Result;
use rusqlite::Connection;

/// Answers one listing request: parse filters, rank and page distinct ids, then
/// hydrate only that page.
///
/// The id page and the hydration are separate reads; a write landing between them is
/// tolerated, not prevented.
pub fn list_books(conn: &Connection, params: &BookListParams) -> Result<BooksResponse> {
    let filters = BookFilters::from_params(params);
    let page = page_number(params.page.as_deref());
    tracing::debug!("Listing books: filters={:?} page={}", filters, page);

    let predicate = build_predicate(&filters);
    let window = fetch_page(conn, &predicate, page)?;

    if window.is_empty() {
        tracing::info!(
            "No books on page {} ({} total matches)",
            page,
            window.total_count
        );
        return Ok(BooksResponse {
            total_count: window.total_count,
            books: Vec::new(),
        });
    }

    let books = assemble(conn, &window.ids)?;
    tracing::info!(
        "Listed {} books on page {} ({} total matches)",
        books.len(),
        page,
        window.total_count
    );

    Ok(BooksResponse {
        total_count: window.total_count,
        books,
    })
}
