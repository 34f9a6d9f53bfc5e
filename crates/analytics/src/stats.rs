//! Windowed aggregation over the analytics log. Every query re-scans
//! the file; malformed rows are skipped individually and never abort a
//! scan.

use crate::event::{AnalyticsEvent, EventType};
use crate::writer::Analytics;
use chrono::{Duration, Local};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use termbot_model::parse_records;

const TOP_N: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchStats {
    pub total: u64,
    /// Searches whose recorded result count was greater than zero.
    pub successful: u64,
    pub failed: u64,
    pub success_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsReport {
    pub period_days: i64,
    pub total_events: u64,
    pub unique_users: usize,
    pub unique_users_today: usize,
    pub events_today: u64,
    pub languages: BTreeMap<String, u64>,
    pub top_categories: Vec<(String, u64)>,
    pub top_queries: Vec<(String, u64)>,
    pub search: SearchStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedQuery {
    pub query: String,
    pub count: u64,
}

impl Analytics {
    /// Aggregate statistics over the trailing `days` window.
    #[must_use]
    pub fn stats(&self, days: i64) -> StatsReport {
        compute_stats(&self.log_path, days)
    }

    /// Search queries with zero results in the window, most frequent
    /// first — the "what is missing from the catalog" report.
    #[must_use]
    pub fn failed_queries(&self, days: i64, limit: usize) -> Vec<FailedQuery> {
        compute_failed_queries(&self.log_path, days, limit)
    }

    /// Event counts per calendar day within the window.
    #[must_use]
    pub fn user_activity(&self, days: i64) -> BTreeMap<String, u64> {
        compute_user_activity(&self.log_path, days)
    }
}

/// Read and window the log. A missing or unreadable file yields no
/// events; the header row drops out when its timestamp fails to parse.
fn scan_window(path: &Path, days: i64) -> Vec<AnalyticsEvent> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            log::error!("Failed to read analytics log {}: {e}", path.display());
            return Vec::new();
        }
    };
    let cutoff = Local::now() - Duration::days(days);
    parse_records(&raw)
        .iter()
        .filter_map(|row| AnalyticsEvent::from_row(row))
        .filter(|event| event.timestamp >= cutoff)
        .collect()
}

pub(crate) fn compute_stats(path: &Path, days: i64) -> StatsReport {
    let events = scan_window(path, days);
    let today = Local::now().date_naive();

    let unique_users: HashSet<i64> = events.iter().map(|e| e.user_id).collect();
    let today_events: Vec<&AnalyticsEvent> = events
        .iter()
        .filter(|e| e.timestamp.date_naive() == today)
        .collect();
    let unique_users_today: HashSet<i64> = today_events.iter().map(|e| e.user_id).collect();

    let mut languages: BTreeMap<String, u64> = BTreeMap::new();
    let mut categories: HashMap<String, u64> = HashMap::new();
    let mut queries: HashMap<String, u64> = HashMap::new();
    let mut search = SearchStats::default();

    for event in &events {
        if let Some(lang) = event.lang {
            *languages.entry(lang.as_str().to_string()).or_insert(0) += 1;
        }
        if event.event_type == EventType::CategorySelected && !event.category.is_empty() {
            *categories.entry(event.category.clone()).or_insert(0) += 1;
        }
        if event.event_type == EventType::Search {
            search.total += 1;
            if event.results_count > 0 {
                search.successful += 1;
            } else {
                search.failed += 1;
            }
            if !event.query.is_empty() {
                *queries.entry(event.query.to_lowercase()).or_insert(0) += 1;
            }
        }
    }
    if search.total > 0 {
        search.success_rate = search.successful as f64 / search.total as f64 * 100.0;
    }

    StatsReport {
        period_days: days,
        total_events: events.len() as u64,
        unique_users: unique_users.len(),
        unique_users_today: unique_users_today.len(),
        events_today: today_events.len() as u64,
        languages,
        top_categories: top_n(categories),
        top_queries: top_n(queries),
        search,
    }
}

pub(crate) fn compute_failed_queries(path: &Path, days: i64, limit: usize) -> Vec<FailedQuery> {
    let mut counts: HashMap<String, u64> = HashMap::new();
    for event in scan_window(path, days) {
        if event.event_type == EventType::Search
            && event.results_count == 0
            && !event.query.is_empty()
        {
            *counts.entry(event.query.to_lowercase()).or_insert(0) += 1;
        }
    }
    let mut failed: Vec<FailedQuery> = top_n(counts)
        .into_iter()
        .map(|(query, count)| FailedQuery { query, count })
        .collect();
    failed.truncate(limit);
    failed
}

pub(crate) fn compute_user_activity(path: &Path, days: i64) -> BTreeMap<String, u64> {
    let mut daily: BTreeMap<String, u64> = BTreeMap::new();
    for event in scan_window(path, days) {
        let key = event.timestamp.date_naive().to_string();
        *daily.entry(key).or_insert(0) += 1;
    }
    daily
}

/// Frequency table to a ranked list: count descending, name ascending
/// on ties so output stays deterministic, cut to the top ten.
fn top_n(counts: HashMap<String, u64>) -> Vec<(String, u64)> {
    let mut ranked: Vec<(String, u64)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(TOP_N);
    ranked
}

#[cfg(test)]
mod tests {
    use super::{compute_failed_queries, compute_stats, compute_user_activity};
    use crate::event::{AnalyticsEvent, EventType, LOG_HEADER};
    use chrono::{Duration, Local};
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use std::path::PathBuf;
    use termbot_model::Lang;

    struct Row {
        days_ago: i64,
        user_id: i64,
        event_type: EventType,
        lang: Option<Lang>,
        category: &'static str,
        query: &'static str,
        results_count: u32,
    }

    fn write_log(rows: &[Row]) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("analytics.csv");
        let mut file = std::fs::File::create(&path).expect("create log");
        writeln!(file, "{LOG_HEADER}").unwrap();
        for row in rows {
            let mut event = AnalyticsEvent::now(row.user_id, row.event_type.clone());
            event.timestamp = Local::now() - Duration::days(row.days_ago);
            event.lang = row.lang;
            event.category = row.category.to_string();
            event.query = row.query.to_string();
            event.results_count = row.results_count;
            writeln!(file, "{}", event.to_row()).unwrap();
        }
        // One deliberately malformed row; every scan must skip it.
        writeln!(file, "garbage,row,without,enough,fields").unwrap();
        (dir, path)
    }

    fn search(days_ago: i64, user_id: i64, query: &'static str, results_count: u32) -> Row {
        Row {
            days_ago,
            user_id,
            event_type: EventType::Search,
            lang: Some(Lang::Kk),
            category: "",
            query,
            results_count,
        }
    }

    fn category(days_ago: i64, user_id: i64, category: &'static str) -> Row {
        Row {
            days_ago,
            user_id,
            event_type: EventType::CategorySelected,
            lang: Some(Lang::Ru),
            category,
            query: "",
            results_count: 0,
        }
    }

    #[test]
    fn window_excludes_old_events_everywhere() {
        let (_dir, path) = write_log(&[
            search(0, 1, "сөз", 2),
            search(2, 2, "жоқ", 0),
            // Outside the 7-day window; must not appear in any
            // aggregate.
            search(30, 3, "ескі", 0),
            category(30, 3, "Ескі категория"),
        ]);
        let report = compute_stats(&path, 7);
        assert_eq!(report.total_events, 2);
        assert_eq!(report.unique_users, 2);
        assert_eq!(report.search.total, 2);
        assert!(report.top_queries.iter().all(|(q, _)| q != "ескі"));
        assert!(report.top_categories.is_empty());
    }

    #[test]
    fn success_and_failure_counts() {
        let (_dir, path) = write_log(&[
            search(0, 1, "сөз", 2),
            search(1, 1, "сөз", 1),
            search(1, 2, "жоқ", 0),
        ]);
        let report = compute_stats(&path, 7);
        assert_eq!(report.search.successful, 2);
        assert_eq!(report.search.failed, 1);
        assert!((report.search.success_rate - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn queries_are_case_folded_and_ranked() {
        let (_dir, path) = write_log(&[
            search(0, 1, "Сөз", 1),
            search(0, 2, "сөз", 1),
            search(1, 3, "басқа", 1),
        ]);
        let report = compute_stats(&path, 7);
        assert_eq!(report.top_queries[0], ("сөз".to_string(), 2));
        assert_eq!(report.top_queries[1], ("басқа".to_string(), 1));
    }

    #[test]
    fn category_counts_only_selection_events() {
        let (_dir, path) = write_log(&[
            category(0, 1, "Денсаулық"),
            category(1, 2, "Денсаулық"),
            category(1, 2, "Экономика"),
        ]);
        let report = compute_stats(&path, 7);
        assert_eq!(report.top_categories[0], ("Денсаулық".to_string(), 2));
        assert_eq!(report.languages.get("ru"), Some(&3));
    }

    #[test]
    fn failed_queries_ranked_and_limited() {
        let (_dir, path) = write_log(&[
            search(0, 1, "жоқ", 0),
            search(1, 2, "Жоқ", 0),
            search(1, 3, "тағы", 0),
            search(1, 4, "табылды", 3),
        ]);
        let failed = compute_failed_queries(&path, 7, 1);
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].query, "жоқ");
        assert_eq!(failed[0].count, 2);
    }

    #[test]
    fn user_activity_buckets_by_day() {
        let (_dir, path) = write_log(&[
            search(0, 1, "а", 1),
            search(0, 2, "б", 1),
            search(1, 1, "в", 1),
        ]);
        let activity = compute_user_activity(&path, 7);
        let today = Local::now().date_naive().to_string();
        assert_eq!(activity.get(&today), Some(&2));
        assert_eq!(activity.values().sum::<u64>(), 3);
    }

    #[test]
    fn missing_log_degrades_to_empty_report() {
        let report = compute_stats(std::path::Path::new("/nonexistent/analytics.csv"), 7);
        assert_eq!(report.total_events, 0);
        assert_eq!(report.unique_users, 0);
        assert!(report.top_queries.is_empty());
    }
}
