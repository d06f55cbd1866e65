//! Catalog Store Module
//!
//! Owns the relational store the catalog reads from.
//!
//! ## Core Concepts
//! - **Schema**: Books with authors, formats, languages, subjects and bookshelves
//!   attached through link tables (`schema`).
//! - **Handle**: `CatalogStore` holds a small pool of SQLite connections and is
//!   passed explicitly to whoever needs it; there is no ambient connection state.
//! - **Case folding**: a `casefold()` SQL function is registered on every connection so
//!   substring filters compare Unicode-lowercased text.

pub mod schema;
pub mod sqlite;

pub use sqlite::{count_books, CatalogStore, DEFAULT_POOL_SIZE};

#[cfg(test)]
mod tests;
