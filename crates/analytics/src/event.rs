use chrono::{DateTime, Local};
use termbot_model::{write_record, Lang};

/// Header row of the analytics log file.
pub const LOG_HEADER: &str =
    "timestamp,user_id,username,event_type,lang,category,subcategory,query,results_count";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventType {
    LanguageSelected,
    CategorySelected,
    Search,
    /// Unknown tags found in the log are preserved, not rejected; they
    /// still count toward totals and unique users.
    Other(String),
}

impl EventType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            EventType::LanguageSelected => "language_selected",
            EventType::CategorySelected => "category_selected",
            EventType::Search => "search",
            EventType::Other(tag) => tag,
        }
    }

    #[must_use]
    pub fn parse(tag: &str) -> EventType {
        match tag {
            "language_selected" => EventType::LanguageSelected,
            "category_selected" => EventType::CategorySelected,
            "search" => EventType::Search,
            other => EventType::Other(other.to_string()),
        }
    }
}

/// One write-once row of the analytics log.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsEvent {
    pub timestamp: DateTime<Local>,
    pub user_id: i64,
    pub username: String,
    pub event_type: EventType,
    pub lang: Option<Lang>,
    pub category: String,
    pub subcategory: String,
    pub query: String,
    pub results_count: u32,
}

impl AnalyticsEvent {
    /// Start a row stamped "now"; optional fields default to empty.
    #[must_use]
    pub fn now(user_id: i64, event_type: EventType) -> AnalyticsEvent {
        AnalyticsEvent {
            timestamp: Local::now(),
            user_id,
            username: String::new(),
            event_type,
            lang: None,
            category: String::new(),
            subcategory: String::new(),
            query: String::new(),
            results_count: 0,
        }
    }

    #[must_use]
    pub fn to_row(&self) -> String {
        write_record(&[
            &self.timestamp.to_rfc3339(),
            &self.user_id.to_string(),
            &self.username,
            self.event_type.as_str(),
            self.lang.map(Lang::as_str).unwrap_or(""),
            &self.category,
            &self.subcategory,
            &self.query,
            &self.results_count.to_string(),
        ])
    }

    /// Parse one log row. Returns `None` for malformed rows (wrong
    /// arity, unparseable timestamp or count); the scan skips them.
    #[must_use]
    pub fn from_row(fields: &[String]) -> Option<AnalyticsEvent> {
        if fields.len() < 9 {
            return None;
        }
        let timestamp = DateTime::parse_from_rfc3339(&fields[0])
            .ok()?
            .with_timezone(&Local);
        let user_id: i64 = fields[1].parse().ok()?;
        let results_count: u32 = fields[8].parse().ok()?;
        Some(AnalyticsEvent {
            timestamp,
            user_id,
            username: fields[2].clone(),
            event_type: EventType::parse(&fields[3]),
            lang: Lang::parse(&fields[4]),
            category: fields[5].clone(),
            subcategory: fields[6].clone(),
            query: fields[7].clone(),
            results_count,
        })
    }
}
