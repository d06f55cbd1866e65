//! Result Assembler
//!
//! Hydrates the ids of one page into full book documents. Records are batch-loaded
//! per relation, grouped by book, and emitted in the order of the incoming ids.

use super::types::{
    AuthorDocument, AuthorRecord, BookDocument, BookRecord, BookRelations, FormatRecord,
    LinkDocument,
};
use anyhow::{Context, Result};
use rusqlite::{Connection, Row};
use std::collections::{HashMap, HashSet};

/// Loads and maps the books behind `ids`, keeping the order of `ids`.
///
/// Ids whose book no longer exists are skipped.
pub fn assemble(conn: &Connection, ids: &[i64]) -> Result<Vec<BookDocument>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut books = load_books(conn, ids)?;
    let mut relations = load_relations(conn, ids)?;

    let documents = ids
        .iter()
        .filter_map(|id| {
            let book = books.remove(id)?;
            let related = relations.remove(id).unwrap_or_default();
            Some(to_document(book, related))
        })
        .collect();

    Ok(documents)
}

pub fn to_document(book: BookRecord, relations: BookRelations) -> BookDocument {
    let bookshelves = distinct(relations.bookshelves);
    let genre = bookshelves.first().cloned();

    let mut seen_links = HashSet::new();
    let links = relations
        .formats
        .into_iter()
        .map(|format| LinkDocument {
            mime_type: format.mime_type,
            url: format.url,
        })
        .filter(|link| seen_links.insert(link.clone()))
        .collect();

    BookDocument {
        title: book.title,
        authors: relations
            .authors
            .into_iter()
            .map(|author| AuthorDocument {
                name: author.name,
                birth_year: author.birth_year,
                death_year: author.death_year,
            })
            .collect(),
        genre,
        languages: distinct(relations.languages),
        subjects: distinct(relations.subjects),
        bookshelves,
        links,
    }
}

/// Drops repeated values, keeping the first occurrence of each.
pub fn distinct(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

/// `IN` source over the page ids, bound as one JSON array parameter.
const PAGE_IDS: &str = "SELECT value FROM json_each(?)";

fn load_books(conn: &Connection, ids: &[i64]) -> Result<HashMap<i64, BookRecord>> {
    let sql = format!(
        "SELECT id, gutenberg_id, title, download_count FROM books_book
         WHERE id IN ({PAGE_IDS})"
    );

    let rows = query_rows(conn, &sql, ids, |row| {
        Ok(BookRecord {
            id: row.get(0)?,
            gutenberg_id: row.get(1)?,
            title: row.get(2)?,
            download_count: row.get(3)?,
        })
    })
    .context("Failed to load book records")?;

    Ok(rows.into_iter().map(|book| (book.id, book)).collect())
}

fn load_relations(conn: &Connection, ids: &[i64]) -> Result<HashMap<i64, BookRelations>> {
    let mut relations: HashMap<i64, BookRelations> = HashMap::new();

    let authors = query_rows(
        conn,
        &format!(
            "SELECT l.book_id, a.name, a.birth_year, a.death_year
             FROM books_book_authors AS l JOIN books_author AS a ON a.id = l.author_id
             WHERE l.book_id IN ({PAGE_IDS}) ORDER BY l.rowid"
        ),
        ids,
        |row| {
            Ok((
                row.get::<_, i64>(0)?,
                AuthorRecord {
                    name: row.get(1)?,
                    birth_year: row.get(2)?,
                    death_year: row.get(3)?,
                },
            ))
        },
    )
    .context("Failed to load authors")?;
    for (book_id, author) in authors {
        relations.entry(book_id).or_default().authors.push(author);
    }

    let formats = query_rows(
        conn,
        &format!(
            "SELECT book_id, mime_type, url FROM books_format
             WHERE book_id IN ({PAGE_IDS}) ORDER BY id"
        ),
        ids,
        |row| {
            Ok((
                row.get::<_, i64>(0)?,
                FormatRecord {
                    mime_type: row.get(1)?,
                    url: row.get(2)?,
                },
            ))
        },
    )
    .context("Failed to load formats")?;
    for (book_id, format) in formats {
        relations.entry(book_id).or_default().formats.push(format);
    }

    let languages = load_names(
        conn,
        "books_book_languages",
        "language_id",
        "books_language",
        "code",
        ids,
    )
    .context("Failed to load languages")?;
    for (book_id, code) in languages {
        relations.entry(book_id).or_default().languages.push(code);
    }

    let subjects = load_names(
        conn,
        "books_book_subjects",
        "subject_id",
        "books_subject",
        "name",
        ids,
    )
    .context("Failed to load subjects")?;
    for (book_id, name) in subjects {
        relations.entry(book_id).or_default().subjects.push(name);
    }

    let bookshelves = load_names(
        conn,
        "books_book_bookshelves",
        "bookshelf_id",
        "books_bookshelf",
        "name",
        ids,
    )
    .context("Failed to load bookshelves")?;
    for (book_id, name) in bookshelves {
        relations.entry(book_id).or_default().bookshelves.push(name);
    }

    Ok(relations)
}

/// `(book_id, value)` pairs for a link-table relation, in link insertion order.
fn load_names(
    conn: &Connection,
    link: &str,
    foreign_key: &str,
    table: &str,
    column: &str,
    ids: &[i64],
) -> rusqlite::Result<Vec<(i64, String)>> {
    let sql = format!(
        "SELECT l.book_id, t.{column} FROM {link} AS l JOIN {table} AS t ON t.id = l.{foreign_key}
         WHERE l.book_id IN ({PAGE_IDS}) ORDER BY l.rowid"
    );
    query_rows(conn, &sql, ids, |row| Ok((row.get(0)?, row.get(1)?)))
}

fn query_rows<T>(
    conn: &Connection,
    sql: &str,
    ids: &[i64],
    map: impl FnMut(&Row<'_>) -> rusqlite::Result<T>,
) -> rusqlite::Result<Vec<T>> {
    let ids = serde_json::Value::from(ids.to_vec()).to_string();
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([ids], map)?;
    rows.collect()
}
