use super::schema::ensure_schema;
use anyhow::{Context, Result};
use rusqlite::functions::FunctionFlags;
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, TryLockError};
use std::time::Duration;

pub const DEFAULT_POOL_SIZE: usize = 4;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared handle to the catalog database.
///
/// Holds a fixed set of connections; each call borrows whichever one is free, so
/// concurrent requests only queue once every connection is in use. Cloning is cheap
/// and clones share the same connections. Calls are blocking, so async callers should
/// go through [`CatalogStore::run`].
#[derive(Clone)]
pub struct CatalogStore {
    pool: Arc<Vec<Mutex<Connection>>>,
    next: Arc<AtomicUsize>,
}

impl CatalogStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_pooled(path, DEFAULT_POOL_SIZE)
    }

    /// Opens `size` connections (at least one) to the database file at `path`.
    pub fn open_pooled<P: AsRef<Path>>(path: P, size: usize) -> Result<Self> {
        let path = path.as_ref();
        let mut pool = Vec::with_capacity(size.max(1));

        for _ in 0..size.max(1) {
            let conn = Connection::open(path)
                .with_context(|| format!("Failed to open catalog database {}", path.display()))?;
            prepare_connection(&conn)?;
            if pool.is_empty() {
                ensure_schema(&conn).context("Failed to ensure catalog schema")?;
            }
            pool.push(Mutex::new(conn));
        }

        Ok(Self::from_pool(pool))
    }

    /// A private in-memory database. It lives in one connection, so the pool has size 1.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory catalog")?;
        Self::from_connection(conn)
    }

    /// Prepares an existing connection: registers `casefold()` and creates missing tables.
    pub fn from_connection(conn: Connection) -> Result<Self> {
        prepare_connection(&conn)?;
        ensure_schema(&conn).context("Failed to ensure catalog schema")?;

        Ok(Self::from_pool(vec![Mutex::new(conn)]))
    }

    fn from_pool(pool: Vec<Mutex<Connection>>) -> Self {
        Self {
            pool: Arc::new(pool),
            next: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn pool_size(&self) -> usize {
        self.pool.len()
    }

    /// Runs `f` on a free connection, starting the search at the next slot in turn.
    /// Blocks on that slot only when every connection is busy.
    pub fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let size = self.pool.len();
        let start = self.next.fetch_add(1, Ordering::Relaxed) % size;

        for offset in 0..size {
            match self.pool[(start + offset) % size].try_lock() {
                Ok(conn) => return f(&conn),
                Err(TryLockError::WouldBlock) => continue,
                Err(TryLockError::Poisoned(_)) => {
                    return Err(anyhow::anyhow!("Catalog connection mutex poisoned"))
                }
            }
        }

        let conn = self.pool[start]
            .lock()
            .map_err(|_| anyhow::anyhow!("Catalog connection mutex poisoned"))?;
        f(&conn)
    }

    /// Runs `f` on a pooled connection from the blocking thread pool.
    pub async fn run<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.with_conn(f))
            .await
            .context("Catalog store task failed")?
    }
}

/// Number of rows in `books_book`.
pub fn count_books(conn: &Connection) -> Result<u64> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM books_book", [], |row| row.get(0))
        .context("Failed to count books")?;
    Ok(count.max(0) as u64)
}

fn prepare_connection(conn: &Connection) -> Result<()> {
    conn.busy_timeout(BUSY_TIMEOUT)
        .context("Failed to set busy timeout")?;
    register_casefold(conn).context("Failed to register casefold()")?;
    Ok(())
}

/// Registers `casefold(x)`: Unicode lowercase of `x`, NULL for NULL.
///
/// SQLite's own `lower()` and `LIKE` only fold ASCII letters.
fn register_casefold(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "casefold",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let folded = match ctx.get_raw(0) {
                ValueRef::Null => None,
                ValueRef::Integer(i) => Some(i.to_string()),
                ValueRef::Real(r) => Some(r.to_string()),
                ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                    Some(String::from_utf8_lossy(bytes).to_lowercase())
                }
            };
            Ok(folded)
        },
    )
}
