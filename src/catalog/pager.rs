use super::predicate::Predicate;
use anyhow::{Context, Result};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};

pub const PAGE_SIZE: u64 = 25;

/// Popularity ranking, with the row id as a deterministic tie-break.
const RANKING: &str = "COALESCE(b.download_count, 0) DESC, b.id ASC";

/// One ranked window of distinct book ids.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub total_count: u64,
    pub ids: Vec<i64>,
}

impl Page {
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

pub fn offset_for(page: u64) -> u64 {
    page.max(1).saturating_sub(1).saturating_mul(PAGE_SIZE)
}

/// Counts the distinct books satisfying `predicate`.
pub fn count_matches(conn: &Connection, predicate: &Predicate) -> Result<u64> {
    let condition = predicate.to_sql();
    let sql = format!(
        "SELECT COUNT(*) FROM books_book AS b WHERE {}",
        condition.sql
    );

    let count: i64 = conn
        .query_row(&sql, params_from_iter(condition.params.iter()), |row| {
            row.get(0)
        })
        .context("Failed to count matching books")?;

    Ok(count.max(0) as u64)
}

/// Ids of the books on `page` (1-based), most downloaded first.
pub fn page_ids(conn: &Connection, predicate: &Predicate, page: u64) -> Result<Vec<i64>> {
    let condition = predicate.to_sql();
    let sql = format!(
        "SELECT b.id FROM books_book AS b WHERE {} ORDER BY {} LIMIT ? OFFSET ?",
        condition.sql, RANKING
    );

    let offset = i64::try_from(offset_for(page)).unwrap_or(i64::MAX);
    let mut params = condition.params;
    params.push(Value::Integer(PAGE_SIZE as i64));
    params.push(Value::Integer(offset));

    let mut stmt = conn
        .prepare(&sql)
        .context("Failed to prepare id page query")?;
    let ids = stmt
        .query_map(params_from_iter(params.iter()), |row| row.get::<_, i64>(0))
        .context("Failed to run id page query")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to read id page")?;

    Ok(ids)
}

pub fn fetch_page(conn: &Connection, predicate: &Predicate, page: u64) -> Result<Page> {
    let total_count = count_matches(conn, predicate)?;
    let ids = page_ids(conn, predicate, page)?;
    Ok(Page { total_count, ids })
}
