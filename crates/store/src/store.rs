use crate::search;
use std::collections::HashMap;
use std::path::Path;
use termbot_model::{parse_records, Lang, TermRecord};

type BucketKey = (String, String, Lang);

/// Immutable in-memory catalog with prebuilt lookup indexes.
///
/// Built once at startup; a missing or malformed backing file yields an
/// empty store and a logged error, never a startup failure.
pub struct TermStore {
    /// All records in source-file order; backs global search.
    records: Vec<TermRecord>,
    categories_by_lang: HashMap<Lang, Vec<String>>,
    subcategories_by_key: HashMap<(String, Lang), Vec<String>>,
    buckets: HashMap<BucketKey, Vec<TermRecord>>,
}

impl TermStore {
    /// Load the catalog from a delimited file. Fails soft: any read or
    /// parse problem degrades to an empty store.
    #[must_use]
    pub fn load(path: impl AsRef<Path>) -> TermStore {
        let path = path.as_ref();
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                log::error!("Failed to read term file {}: {e}", path.display());
                return TermStore::from_records(Vec::new());
            }
        };

        let rows = parse_records(&raw);
        let total = rows.len();
        let records: Vec<TermRecord> = rows
            .iter()
            // The header row drops out here too: its lang column does
            // not parse as a language tag.
            .filter_map(|row| TermRecord::from_fields(row))
            .collect();

        log::info!(
            "Loaded {} terms from {} ({} rows skipped)",
            records.len(),
            path.display(),
            total.saturating_sub(records.len()),
        );
        TermStore::from_records(records)
    }

    /// Build the store and all derived indexes from an in-memory record
    /// list. Index construction is total; duplicate records simply land
    /// in the same bucket twice.
    #[must_use]
    pub fn from_records(records: Vec<TermRecord>) -> TermStore {
        let mut categories_by_lang: HashMap<Lang, Vec<String>> = HashMap::new();
        let mut subcategories_by_key: HashMap<(String, Lang), Vec<String>> = HashMap::new();
        let mut buckets: HashMap<BucketKey, Vec<TermRecord>> = HashMap::new();

        for rec in &records {
            let cats = categories_by_lang.entry(rec.lang).or_default();
            if !cats.contains(&rec.category) {
                cats.push(rec.category.clone());
            }

            let subs = subcategories_by_key
                .entry((rec.category.clone(), rec.lang))
                .or_default();
            if !subs.contains(&rec.subcategory) {
                subs.push(rec.subcategory.clone());
            }

            buckets
                .entry((rec.category.clone(), rec.subcategory.clone(), rec.lang))
                .or_default()
                .push(rec.clone());
        }

        for cats in categories_by_lang.values_mut() {
            cats.sort();
        }
        for subs in subcategories_by_key.values_mut() {
            subs.sort();
        }

        TermStore {
            records,
            categories_by_lang,
            subcategories_by_key,
            buckets,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in source order.
    #[must_use]
    pub fn records(&self) -> &[TermRecord] {
        &self.records
    }

    /// Category names for one interface language, sorted.
    #[must_use]
    pub fn categories(&self, lang: Lang) -> &[String] {
        self.categories_by_lang
            .get(&lang)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Subcategory names under one category, sorted. Unknown keys yield
    /// an empty slice, never an error.
    #[must_use]
    pub fn subcategories(&self, category: &str, lang: Lang) -> &[String] {
        self.subcategories_by_key
            .get(&(category.to_string(), lang))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The bucket for one (category, subcategory, language) key, in
    /// source-file order. Empty slice for absent keys.
    #[must_use]
    pub fn terms(&self, category: &str, subcategory: &str, lang: Lang) -> &[TermRecord] {
        self.buckets
            .get(&(category.to_string(), subcategory.to_string(), lang))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Global search across the whole catalog, every language included.
    /// Exact name matches rank before substring matches; both tiers keep
    /// source order. Empty queries return nothing.
    #[must_use]
    pub fn search(&self, query: &str, max_results: usize) -> Vec<&TermRecord> {
        search::global(&self.records, query, max_results)
    }

    /// Search restricted to one prebuilt bucket. Tier order: exact name,
    /// substring of name, substring of description; a record lands in
    /// the first tier it matches.
    #[must_use]
    pub fn search_in_filtered(
        &self,
        query: &str,
        category: &str,
        subcategory: &str,
        lang: Lang,
        max_results: usize,
    ) -> Vec<&TermRecord> {
        search::in_bucket(self.terms(category, subcategory, lang), query, max_results)
    }
}
