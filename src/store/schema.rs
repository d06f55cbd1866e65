use rusqlite::Connection;

/// Tables and indexes of the Gutenberg metadata schema.
///
/// Books own their formats directly; every other relation goes through a
/// `books_book_*` link table holding only the pair of foreign keys.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS books_book (
    id INTEGER PRIMARY KEY,
    gutenberg_id INTEGER NOT NULL UNIQUE,
    title TEXT,
    download_count INTEGER
);

CREATE TABLE IF NOT EXISTS books_author (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    birth_year INTEGER,
    death_year INTEGER
);

CREATE TABLE IF NOT EXISTS books_format (
    id INTEGER PRIMARY KEY,
    book_id INTEGER NOT NULL REFERENCES books_book(id) ON DELETE CASCADE,
    mime_type TEXT NOT NULL,
    url TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS books_language (
    id INTEGER PRIMARY KEY,
    code TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS books_subject (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS books_bookshelf (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS books_book_authors (
    book_id INTEGER NOT NULL REFERENCES books_book(id) ON DELETE CASCADE,
    author_id INTEGER NOT NULL REFERENCES books_author(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS books_book_languages (
    book_id INTEGER NOT NULL REFERENCES books_book(id) ON DELETE CASCADE,
    language_id INTEGER NOT NULL REFERENCES books_language(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS books_book_subjects (
    book_id INTEGER NOT NULL REFERENCES books_book(id) ON DELETE CASCADE,
    subject_id INTEGER NOT NULL REFERENCES books_subject(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS books_book_bookshelves (
    book_id INTEGER NOT NULL REFERENCES books_book(id) ON DELETE CASCADE,
    bookshelf_id INTEGER NOT NULL REFERENCES books_bookshelf(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_books_format_book ON books_format(book_id);
CREATE INDEX IF NOT EXISTS idx_books_book_authors_book ON books_book_authors(book_id);
CREATE INDEX IF NOT EXISTS idx_books_book_languages_book ON books_book_languages(book_id);
CREATE INDEX IF NOT EXISTS idx_books_book_subjects_book ON books_book_subjects(book_id);
CREATE INDEX IF NOT EXISTS idx_books_book_bookshelves_book ON books_book_bookshelves(book_id);
";

/// Creates any missing catalog tables. Existing tables and rows are left untouched.
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)
}
