//! Gutenberg Catalog Library
//!
//! Read-only search API over a relational catalog of Project Gutenberg books.
//! It serves as the foundation for the binary executable (`main.rs`).
//!
//! ## Modules
//! - **`catalog`**: Filter parsing, predicate building, ranked paging and result
//!   assembly behind `GET /v1/books`.
//! - **`config`**: Bind address and database path resolution.
//! - **`store`**: The SQLite store handle and schema bootstrap.

pub mod catalog;
pub mod config;
pub mod store;
