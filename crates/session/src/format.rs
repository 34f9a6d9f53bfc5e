//! Pure rendering of term records into display pages. Output uses the
//! front-end's lightweight markup (bold term, italic metadata), so all
//! catalog content is escaped before insertion.

use termbot_model::TermRecord;

/// Escape characters with markup meaning so arbitrary catalog text can
/// never corrupt rendering.
#[must_use]
pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '*' | '_' | '[' | ']' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Render one record: bold term, optional `_(category / subcategory /
/// lang)_` metadata, description on the next line. A record whose term
/// is empty after trimming renders as an empty string; callers skip it.
#[must_use]
pub fn format_record(record: &TermRecord, show_lang: bool, show_category: bool) -> String {
    let term = record.term.trim();
    if term.is_empty() {
        return String::new();
    }

    let mut meta = Vec::new();
    if show_category && !record.category.is_empty() {
        meta.push(escape_markup(&record.category));
    }
    if show_category && !record.subcategory.is_empty() {
        meta.push(escape_markup(&record.subcategory));
    }
    if show_lang {
        meta.push(record.lang.as_str().to_string());
    }

    let mut out = format!("**{}**", escape_markup(term));
    if !meta.is_empty() {
        out.push_str(&format!(" _({})_", meta.join(" / ")));
    }
    out.push('\n');
    out.push_str(&escape_markup(record.description.trim()));
    out
}

/// Render one page of a result list. Entries are numbered by their
/// 1-based position in the whole list, not per page, and joined by a
/// blank line. A page past the end yields an empty string; clamping is
/// the caller's job.
#[must_use]
pub fn format_page(
    records: &[TermRecord],
    page: usize,
    page_size: usize,
    show_lang: bool,
    show_category: bool,
) -> String {
    if page == 0 || page_size == 0 {
        return String::new();
    }
    let start = (page - 1) * page_size;
    if start >= records.len() {
        return String::new();
    }
    let end = (start + page_size).min(records.len());

    let mut entries = Vec::new();
    for (offset, record) in records[start..end].iter().enumerate() {
        let body = format_record(record, show_lang, show_category);
        if body.is_empty() {
            continue;
        }
        entries.push(format!("{}. {}", start + offset + 1, body));
    }
    entries.join("\n\n")
}
