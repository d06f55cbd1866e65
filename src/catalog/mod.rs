//! Catalog Query Module
//!
//! Serves the read-only book listing (`GET /v1/books`).
//!
//! ## Pipeline
//! 1. **Filters** (`filters`): comma-separated query parameters become typed value lists.
//! 2. **Predicate** (`predicate`): active filters are ANDed into one condition over a book,
//!    using `EXISTS` sub-queries for every related table.
//! 3. **Paging** (`pager`): the total match count and one ranked page of distinct ids
//!    (most downloaded first, 25 per page).
//! 4. **Assembly** (`assembler`): full records for those ids only, restored to page order
//!    and reshaped into response documents.
//!
//! ## Submodules
//! - **`engine`**: Runs the pipeline for one request.
//! - **`handlers`**: HTTP handlers and the router for the Axum web server.
//! - **`types`**: Request parameters, store records and response DTOs.

pub mod assembler;
pub mod engine;
pub mod filters;
pub mod handlers;
pub mod pager;
pub mod predicate;
pub mod types;
