//! Store Module Tests
//!
//! ## Test Scopes
//! - **Schema**: Bootstrap is idempotent and leaves existing rows alone.
//! - **casefold()**: Unicode lowercasing and NULL handling of the registered SQL function.
//! - **Pool**: File-backed stores hand out a free connection instead of queueing.

#[cfg(test)]
mod tests {
    use crate::store::schema::ensure_schema;
    use crate::store::{count_books, CatalogStore, DEFAULT_POOL_SIZE};
    use std::path::PathBuf;

    /// Fresh database file path under the system temp dir, removed when dropped.
    struct TempDb(PathBuf);

    impl TempDb {
        fn new(name: &str) -> Self {
            let path = std::env::temp_dir().join(format!(
                "gutenberg-catalog-{}-{}.db",
                name,
                std::process::id()
            ));
            let _ = std::fs::remove_file(&path);
            Self(path)
        }
    }

    impl Drop for TempDb {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    #[test]
    fn test_open_in_memory_creates_schema() {
        let store = CatalogStore::open_in_memory().unwrap();

        let tables: i64 = store
            .with_conn(|conn| {
                Ok(conn.query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name LIKE 'books_%'",
                    [],
                    |row| row.get(0),
                )?)
            })
            .unwrap();

        assert_eq!(tables, 10);
    }

    #[test]
    fn test_ensure_schema_is_idempotent() {
        let store = CatalogStore::open_in_memory().unwrap();

        store
            .with_conn(|conn| {
                conn.execute(
                    "INSERT INTO books_book (id, gutenberg_id, title, download_count) VALUES (1, 84, 'Frankenstein', 10)",
                    [],
                )?;
                ensure_schema(conn)?;
                Ok(())
            })
            .unwrap();

        assert_eq!(store.with_conn(count_books).unwrap(), 1);
    }

    #[test]
    fn test_casefold_lowercases_unicode() {
        let store = CatalogStore::open_in_memory().unwrap();

        let folded: String = store
            .with_conn(|conn| Ok(conn.query_row("SELECT casefold('ÉMILE Zola')", [], |row| row.get(0))?))
            .unwrap();

        assert_eq!(folded, "émile zola");
    }

    #[test]
    fn test_casefold_keeps_null() {
        let store = CatalogStore::open_in_memory().unwrap();

        let folded: Option<String> = store
            .with_conn(|conn| Ok(conn.query_row("SELECT casefold(NULL)", [], |row| row.get(0))?))
            .unwrap();

        assert!(folded.is_none());
    }

    #[tokio::test]
    async fn test_run_executes_on_blocking_pool() {
        let store = CatalogStore::open_in_memory().unwrap();

        let count = store.run(count_books).await.unwrap();

        assert_eq!(count, 0);
    }

    // ============================================================
    // POOL
    // ============================================================

    #[test]
    fn test_open_uses_default_pool_size() {
        let db = TempDb::new("default-pool");

        let store = CatalogStore::open(&db.0).unwrap();

        assert_eq!(store.pool_size(), DEFAULT_POOL_SIZE);
        assert_eq!(CatalogStore::open_in_memory().unwrap().pool_size(), 1);
    }

    #[test]
    fn test_busy_connection_does_not_block_others() {
        let db = TempDb::new("busy-pool");
        let store = CatalogStore::open_pooled(&db.0, 2).unwrap();

        let (outer, inner) = store
            .with_conn(|conn| {
                conn.execute(
                    "INSERT INTO books_book (id, gutenberg_id, title, download_count) VALUES (1, 11, 'Ulysses', 5)",
                    [],
                )?;
                // This connection stays locked while the nested call runs
                let inner = store.with_conn(|other| {
                    let folded: String =
                        other.query_row("SELECT casefold('ULYSSES')", [], |row| row.get(0))?;
                    Ok((count_books(other)?, folded))
                })?;
                Ok((count_books(conn)?, inner))
            })
            .unwrap();

        assert_eq!(outer, 1);
        assert_eq!(inner, (1, "ulysses".to_string()));
    }

    #[tokio::test]
    async fn test_concurrent_runs_share_the_pool() {
        let db = TempDb::new("concurrent-pool");
        let store = CatalogStore::open_pooled(&db.0, 3).unwrap();

        let mut handles = Vec::new();
        for _ in 0..12 {
            let store = store.clone();
            handles.push(tokio::spawn(async move { store.run(count_books).await }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), 0);
        }
    }

    #[test]
    fn test_zero_pool_size_opens_one_connection() {
        let db = TempDb::new("zero-pool");

        let store = CatalogStore::open_pooled(&db.0, 0).unwrap();

        assert_eq!(store.pool_size(), 1);
    }
}
