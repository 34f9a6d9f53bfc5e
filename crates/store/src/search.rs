//! Tiered substring search over term records. Case folding uses full
//! Unicode lowercasing so Cyrillic and Kazakh letters compare properly.

use termbot_model::TermRecord;

/// Global search tiers: exact name match, then substring of name.
/// Both tiers keep source order; truncation happens after concatenation.
pub(crate) fn global<'a>(
    records: &'a [TermRecord],
    query: &str,
    max_results: usize,
) -> Vec<&'a TermRecord> {
    let Some(needle) = fold(query) else {
        return Vec::new();
    };

    let mut exact = Vec::new();
    let mut partial = Vec::new();
    for rec in records {
        let name = rec.term.to_lowercase();
        if name == needle {
            exact.push(rec);
        } else if name.contains(&needle) {
            partial.push(rec);
        }
    }

    exact.extend(partial);
    exact.truncate(max_results);
    exact
}

/// In-bucket search tiers: exact name, substring of name, substring of
/// description. Each record lands in the first tier it matches.
pub(crate) fn in_bucket<'a>(
    bucket: &'a [TermRecord],
    query: &str,
    max_results: usize,
) -> Vec<&'a TermRecord> {
    let Some(needle) = fold(query) else {
        return Vec::new();
    };

    let mut exact = Vec::new();
    let mut by_name = Vec::new();
    let mut by_description = Vec::new();
    for rec in bucket {
        let name = rec.term.to_lowercase();
        if name == needle {
            exact.push(rec);
        } else if name.contains(&needle) {
            by_name.push(rec);
        } else if rec.description.to_lowercase().contains(&needle) {
            by_description.push(rec);
        }
    }

    exact.extend(by_name);
    exact.extend(by_description);
    exact.truncate(max_results);
    exact
}

/// Lowercase and trim the query; `None` means "nothing to search for".
fn fold(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_lowercase())
}
