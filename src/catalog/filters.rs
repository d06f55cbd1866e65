use super::types::BookListParams;

/// A single `gutenberg_id` value.
///
/// Digit-only parts become integers; anything else stays text and can never equal an
/// integer id column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Int(i64),
    Text(String),
}

/// Normalized filter sets, one list per recognized filter. An empty list means the
/// filter was not specified.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookFilters {
    pub gutenberg_ids: Vec<FilterValue>,
    pub languages: Vec<String>,
    pub mime_types: Vec<String>,
    pub topics: Vec<String>,
    pub authors: Vec<String>,
    pub titles: Vec<String>,
}

impl BookFilters {
    pub fn from_params(params: &BookListParams) -> Self {
        Self {
            gutenberg_ids: split_values(params.gutenberg_id.as_deref())
                .into_iter()
                .map(coerce_id)
                .collect(),
            languages: split_values(params.language.as_deref()),
            mime_types: split_values(params.mime_type.as_deref()),
            topics: split_values(params.topic.as_deref()),
            authors: split_values(params.author.as_deref()),
            titles: split_values(params.title.as_deref()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.gutenberg_ids.is_empty()
            && self.languages.is_empty()
            && self.mime_types.is_empty()
            && self.topics.is_empty()
            && self.authors.is_empty()
            && self.titles.is_empty()
    }
}

/// Splits a comma-separated parameter, trimming each part and dropping empty ones.
/// Order and duplicates are preserved.
pub fn split_values(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

pub fn coerce_id(part: String) -> FilterValue {
    if part.bytes().all(|b| b.is_ascii_digit()) {
        // Overflowing digit strings fall through and stay text.
        if let Ok(id) = part.parse::<i64>() {
            return FilterValue::Int(id);
        }
    }
    FilterValue::Text(part)
}

/// Page number from the raw `page` parameter: defaults to 1 and never goes below it.
///
/// A numeric value is truncated to its integer part (`"2.5"` is page 2) and digit
/// strings too large for `i64` saturate at `i64::MAX`. Anything non-numeric is page 1.
pub fn page_number(raw: Option<&str>) -> u64 {
    raw.and_then(integer_part)
        .filter(|page| *page >= 1)
        .map(|page| page as u64)
        .unwrap_or(1)
}

/// Integer part of `[+-]digits[.digits]`, or `None` if the value is not of that form.
fn integer_part(raw: &str) -> Option<i64> {
    let value = raw.trim();
    let (negative, unsigned) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };

    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if whole.is_empty() || !is_digits(whole) || !is_digits(fraction) {
        return None;
    }

    let magnitude = whole.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}
