//! Input validation applied before user text reaches the term store or
//! the identifier mapper. The store itself assumes validated input but
//! still degrades to empty results on anything out of range.

use once_cell::sync::Lazy;
use regex::Regex;

pub const MAX_QUERY_LEN: usize = 200;
pub const MAX_USERNAME_LEN: usize = 100;

/// Numeric IDs from interaction payloads must fall in this range.
const ID_RANGE: std::ops::RangeInclusive<u32> = 1..=10_000;

/// Letters (any script), digits, whitespace, hyphens and apostrophes
/// survive; everything else is stripped.
static QUERY_STRIP: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s'\-]").expect("query regex"));

/// Usernames additionally allow dots and underscores, nothing exotic.
static USERNAME_STRIP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s\-_.]").expect("username regex"));

/// Clean a search query: collapse runs of whitespace, enforce the length
/// cap, strip disallowed characters. Returns `None` when nothing usable
/// remains.
#[must_use]
pub fn sanitize_query(query: &str, max_len: usize) -> Option<String> {
    let collapsed = query.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() || collapsed.chars().count() > max_len {
        return None;
    }
    let cleaned = QUERY_STRIP.replace_all(&collapsed, "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

/// Clean a username for the analytics log; never fails, empty means
/// "no usable name".
#[must_use]
pub fn sanitize_username(username: &str) -> String {
    let truncated: String = username.chars().take(MAX_USERNAME_LEN).collect();
    USERNAME_STRIP.replace_all(&truncated, "").trim().to_string()
}

/// Parse a numeric category/subcategory ID from an interaction payload.
#[must_use]
pub fn validate_id(raw: &str) -> Option<u32> {
    let id: u32 = raw.trim().parse().ok()?;
    ID_RANGE.contains(&id).then_some(id)
}

/// Clamp-check a stats window, 1..=365 days.
#[must_use]
pub fn validate_days(days: i64) -> Option<i64> {
    (1..=365).contains(&days).then_some(days)
}

/// Clamp-check a result limit, 1..=1000.
#[must_use]
pub fn validate_limit(limit: usize) -> Option<usize> {
    (1..=1000).contains(&limit).then_some(limit)
}
