use crate::Lang;
use serde::{Deserialize, Serialize};

/// One catalog entry. Loaded once at startup; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermRecord {
    /// Primary display key; never empty after load.
    pub term: String,
    /// May be empty.
    pub description: String,
    /// Free-text category; empty means uncategorized.
    pub category: String,
    pub subcategory: String,
    pub lang: Lang,
}

impl TermRecord {
    /// Build a record from raw file fields, trimming every field.
    ///
    /// Returns `None` when the term is empty after trimming or the
    /// language tag is unknown; such rows are dropped at load.
    #[must_use]
    pub fn from_fields(fields: &[String]) -> Option<TermRecord> {
        if fields.len() < 5 {
            return None;
        }
        let term = fields[0].trim();
        if term.is_empty() {
            return None;
        }
        let lang = Lang::parse(&fields[4])?;
        Some(TermRecord {
            term: term.to_string(),
            description: fields[1].trim().to_string(),
            category: fields[2].trim().to_string(),
            subcategory: fields[3].trim().to_string(),
            lang,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::TermRecord;
    use crate::Lang;

    fn fields(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn from_fields_trims_everything() {
        let rec = TermRecord::from_fields(&fields(&[
            "  салауат  ",
            " health ",
            " Денсаулық ",
            " Емхана ",
            " kk ",
        ]))
        .expect("valid record");
        assert_eq!(rec.term, "салауат");
        assert_eq!(rec.description, "health");
        assert_eq!(rec.category, "Денсаулық");
        assert_eq!(rec.subcategory, "Емхана");
        assert_eq!(rec.lang, Lang::Kk);
    }

    #[test]
    fn from_fields_drops_empty_term() {
        assert!(TermRecord::from_fields(&fields(&["   ", "d", "c", "s", "kk"])).is_none());
    }

    #[test]
    fn from_fields_drops_unknown_lang() {
        assert!(TermRecord::from_fields(&fields(&["t", "d", "c", "s", "en"])).is_none());
    }

    #[test]
    fn from_fields_drops_short_rows() {
        assert!(TermRecord::from_fields(&fields(&["t", "d", "c"])).is_none());
    }
}
