//! Predicate Builder
//!
//! Turns [`BookFilters`] into a boolean predicate over a single book row `b` and renders
//! it as a parameterized SQL condition. Filters on related rows are expressed as
//! `EXISTS` sub-queries, never joins, so a book matching through several link rows is
//! still one row in the outer query.

use super::filters::{BookFilters, FilterValue};
use rusqlite::types::Value;

/// Columns of `books_book` that filters can target directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookColumn {
    GutenbergId,
    Title,
}

impl BookColumn {
    fn sql(self) -> &'static str {
        match self {
            BookColumn::GutenbergId => "b.gutenberg_id",
            BookColumn::Title => "b.title",
        }
    }

    fn is_integer(self) -> bool {
        matches!(self, BookColumn::GutenbergId)
    }
}

/// Relations reachable from a book, each with the one column filters match against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Authors,
    Formats,
    Languages,
    Subjects,
    Bookshelves,
}

impl Relation {
    /// `FROM` source plus correlation with the outer book. The target table is always
    /// aliased `t`.
    fn source(self) -> &'static str {
        match self {
            Relation::Authors => {
                "books_book_authors AS l JOIN books_author AS t ON t.id = l.author_id \
                 WHERE l.book_id = b.id"
            }
            Relation::Formats => "books_format AS t WHERE t.book_id = b.id",
            Relation::Languages => {
                "books_book_languages AS l JOIN books_language AS t ON t.id = l.language_id \
                 WHERE l.book_id = b.id"
            }
            Relation::Subjects => {
                "books_book_subjects AS l JOIN books_subject AS t ON t.id = l.subject_id \
                 WHERE l.book_id = b.id"
            }
            Relation::Bookshelves => {
                "books_book_bookshelves AS l JOIN books_bookshelf AS t ON t.id = l.bookshelf_id \
                 WHERE l.book_id = b.id"
            }
        }
    }

    fn column(self) -> &'static str {
        match self {
            Relation::Authors => "t.name",
            Relation::Formats => "t.mime_type",
            Relation::Languages => "t.code",
            Relation::Subjects => "t.name",
            Relation::Bookshelves => "t.name",
        }
    }
}

/// Value lists are bound as a single JSON array and expanded with `json_each`, so the
/// number of SQL parameters does not grow with the number of filter values.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Exact match against any of the values.
    OneOf(Vec<FilterValue>),
    /// Case-insensitive substring match against any of the terms.
    ContainsAny(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Conjunction; true when empty.
    All(Vec<Predicate>),
    /// Disjunction; false when empty.
    Any(Vec<Predicate>),
    Column {
        column: BookColumn,
        condition: Condition,
    },
    Exists {
        relation: Relation,
        condition: Condition,
    },
}

/// SQL text with its positional (`?`) parameters in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlCondition {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Combines every active filter with AND; values inside one filter combine with OR.
/// A topic term matches when any bookshelf or any subject of the book contains it.
pub fn build_predicate(filters: &BookFilters) -> Predicate {
    let mut clauses = Vec::new();

    if !filters.gutenberg_ids.is_empty() {
        clauses.push(Predicate::Column {
            column: BookColumn::GutenbergId,
            condition: Condition::OneOf(filters.gutenberg_ids.clone()),
        });
    }

    if !filters.languages.is_empty() {
        clauses.push(Predicate::Exists {
            relation: Relation::Languages,
            condition: Condition::OneOf(as_text(&filters.languages)),
        });
    }

    if !filters.mime_types.is_empty() {
        clauses.push(Predicate::Exists {
            relation: Relation::Formats,
            condition: Condition::OneOf(as_text(&filters.mime_types)),
        });
    }

    if !filters.topics.is_empty() {
        clauses.push(Predicate::Any(vec![
            Predicate::Exists {
                relation: Relation::Bookshelves,
                condition: Condition::ContainsAny(filters.topics.clone()),
            },
            Predicate::Exists {
                relation: Relation::Subjects,
                condition: Condition::ContainsAny(filters.topics.clone()),
            },
        ]));
    }

    if !filters.authors.is_empty() {
        clauses.push(Predicate::Exists {
            relation: Relation::Authors,
            condition: Condition::ContainsAny(filters.authors.clone()),
        });
    }

    if !filters.titles.is_empty() {
        clauses.push(Predicate::Column {
            column: BookColumn::Title,
            condition: Condition::ContainsAny(filters.titles.clone()),
        });
    }

    Predicate::All(clauses)
}

fn as_text(values: &[String]) -> Vec<FilterValue> {
    values.iter().cloned().map(FilterValue::Text).collect()
}

impl Predicate {
    pub fn to_sql(&self) -> SqlCondition {
        let mut out = SqlCondition::default();
        self.write(&mut out);
        out
    }

    fn write(&self, out: &mut SqlCondition) {
        match self {
            Predicate::All(parts) => write_joined(parts, " AND ", "1", out),
            Predicate::Any(parts) => write_joined(parts, " OR ", "0", out),
            Predicate::Column { column, condition } => {
                condition.write(column.sql(), column.is_integer(), out)
            }
            Predicate::Exists {
                relation,
                condition,
            } => {
                out.sql.push_str("EXISTS (SELECT 1 FROM ");
                out.sql.push_str(relation.source());
                out.sql.push_str(" AND ");
                condition.write(relation.column(), false, out);
                out.sql.push(')');
            }
        }
    }
}

fn write_joined(parts: &[Predicate], separator: &str, empty: &str, out: &mut SqlCondition) {
    if parts.is_empty() {
        out.sql.push_str(empty);
        return;
    }

    out.sql.push('(');
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            out.sql.push_str(separator);
        }
        part.write(out);
    }
    out.sql.push(')');
}

impl Condition {
    fn write(&self, column: &str, integer_column: bool, out: &mut SqlCondition) {
        match self {
            Condition::OneOf(values) => {
                // SQLite would coerce text like "+12" into an integer; text never
                // equals an integer column here.
                let items: Vec<serde_json::Value> = values
                    .iter()
                    .filter_map(|value| match value {
                        FilterValue::Int(i) => Some(serde_json::Value::from(*i)),
                        FilterValue::Text(_) if integer_column => None,
                        FilterValue::Text(s) => Some(serde_json::Value::from(s.as_str())),
                    })
                    .collect();

                if items.is_empty() {
                    out.sql.push('0');
                    return;
                }

                out.sql.push_str(column);
                out.sql.push_str(" IN (SELECT value FROM json_each(?))");
                out.params.push(Value::Text(serde_json::Value::Array(items).to_string()));
            }
            Condition::ContainsAny(terms) => {
                if terms.is_empty() {
                    out.sql.push('0');
                    return;
                }

                out.sql
                    .push_str("EXISTS (SELECT 1 FROM json_each(?) AS term WHERE instr(casefold(");
                out.sql.push_str(column);
                out.sql.push_str("), casefold(term.value)) > 0)");
                out.params
                    .push(Value::Text(serde_json::Value::from(terms.clone()).to_string()));
            }
        }
    }
}
