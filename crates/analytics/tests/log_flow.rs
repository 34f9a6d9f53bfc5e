use termbot_analytics::{Analytics, AnalyticsConfig, AnalyticsEvent, EventType};
use termbot_model::Lang;
use tokio::time::Duration;

fn config() -> AnalyticsConfig {
    AnalyticsConfig {
        batch_size: 4,
        flush_timeout: Duration::from_millis(50),
        queue_capacity: 64,
    }
}

fn search_event(user_id: i64, query: &str, results_count: u32) -> AnalyticsEvent {
    let mut event = AnalyticsEvent::now(user_id, EventType::Search);
    event.lang = Some(Lang::Kk);
    event.query = query.to_string();
    event.results_count = results_count;
    event
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn events_written_through_queue_feed_the_aggregates() {
    let dir = tempfile::tempdir().expect("tempdir");
    let analytics = Analytics::start(dir.path(), config()).expect("start");

    let mut lang_event = AnalyticsEvent::now(1, EventType::LanguageSelected);
    lang_event.lang = Some(Lang::Ru);
    analytics.log_event(lang_event);

    let mut cat_event = AnalyticsEvent::now(1, EventType::CategorySelected);
    cat_event.lang = Some(Lang::Ru);
    cat_event.category = "Денсаулық".to_string();
    analytics.log_event(cat_event);

    analytics.log_event(search_event(1, "сөз", 3));
    analytics.log_event(search_event(2, "жоғалған", 0));
    analytics.log_event(search_event(3, "Жоғалған", 0));

    analytics.shutdown().await;

    let report = analytics.stats(7);
    assert_eq!(report.total_events, 5);
    assert_eq!(report.unique_users, 3);
    assert_eq!(report.unique_users_today, 3);
    assert_eq!(report.search.total, 3);
    assert_eq!(report.search.successful, 1);
    assert_eq!(report.search.failed, 2);
    assert_eq!(
        report.top_categories,
        vec![("Денсаулық".to_string(), 1)]
    );

    let failed = analytics.failed_queries(7, 10);
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].query, "жоғалған");
    assert_eq!(failed[0].count, 2);

    let activity = analytics.user_activity(7);
    assert_eq!(activity.values().sum::<u64>(), 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn restarting_the_writer_appends_to_the_same_log() {
    let dir = tempfile::tempdir().expect("tempdir");

    let analytics = Analytics::start(dir.path(), config()).expect("first start");
    analytics.log_event(search_event(1, "бір", 1));
    analytics.shutdown().await;

    let analytics = Analytics::start(dir.path(), config()).expect("second start");
    analytics.log_event(search_event(2, "екі", 1));
    analytics.shutdown().await;

    let raw = std::fs::read_to_string(analytics.log_path()).expect("read log");
    assert_eq!(raw.lines().count(), 3);
    assert!(raw.lines().next().unwrap().starts_with("timestamp,"));
}
