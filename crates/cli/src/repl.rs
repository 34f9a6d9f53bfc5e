//! Interactive driver for the conversation state machine. Stands in for
//! the messaging-platform adapter during development and operations:
//! one stdin user, the same transitions, the same analytics events.

use crate::app::App;
use anyhow::Result;
use std::io::{self, BufRead};
use termbot_analytics::{AnalyticsEvent, EventType};
use termbot_model::{sanitize_query, sanitize_username, validate_id, Lang};
use termbot_session::{
    format_page, format_record, Notice, Outcome, Reply, Session, SessionEvent, SessionState,
};

const HELP: &str = "\
commands:
  lang kk|ru      choose interface language
  cat <id>        choose a category by its listed id
  sub <id>        choose a subcategory by its listed id
  next / prev     page through results
  search          search inside the current results
  cancel          leave search mode, restore results
  find <text>     global search across the whole catalog
  home            back to the category list
  back            one step up
  restart         start over from language selection
  quit";

pub fn run(app: &App, user_id: i64) -> Result<()> {
    let username = sanitize_username(&std::env::var("USER").unwrap_or_default());
    let mut session = Session::new(app.config.ui.page_size, app.config.ui.max_filtered_results);
    println!("termbot ({} terms loaded)", app.store.len());
    println!("{HELP}");
    let step = session.restart();
    render(app, &session, &step.outcome);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if !dispatch(app, &mut session, user_id, &username, line) {
            break;
        }
    }
    Ok(())
}

/// Returns `false` when the user quits.
fn dispatch(app: &App, session: &mut Session, user_id: i64, username: &str, line: &str) -> bool {
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((head, tail)) => (head, tail.trim()),
        None => (line, ""),
    };

    let step = match command {
        "quit" | "exit" => return false,
        "help" => {
            println!("{HELP}");
            return true;
        }
        "lang" => match Lang::parse(rest) {
            Some(lang) => session.select_language(&app.store, lang),
            None => {
                println!("unknown language, expected kk or ru");
                return true;
            }
        },
        "cat" => match validate_id(rest).and_then(|id| app.mapper.category_name(id)) {
            Some(name) => session.select_category(&app.store, &name),
            None => {
                println!("category not found");
                return true;
            }
        },
        "sub" => match validate_id(rest).and_then(|id| app.mapper.subcategory_name(id)) {
            Some(name) => session.select_subcategory(&app.store, &name),
            None => {
                println!("subcategory not found");
                return true;
            }
        },
        "next" => session.next_page(),
        "prev" => session.prev_page(),
        "search" => session.start_search(),
        "cancel" => session.cancel_search(),
        "home" => session.go_home(&app.store),
        "back" => session.go_back(&app.store),
        "restart" => session.restart(),
        "find" => {
            global_find(app, session, user_id, username, rest);
            return true;
        }
        // In search mode any other input is the query itself.
        _ if matches!(session.state(), SessionState::SearchingInResults { .. }) => {
            match sanitize_query(line, app.config.ui.max_query_len) {
                Some(query) => session.submit_search(&app.store, &query),
                None => {
                    println!("query is empty or too long after cleanup");
                    return true;
                }
            }
        }
        _ => {
            println!("unknown command, try 'help'");
            return true;
        }
    };

    if let Some(event) = &step.event {
        app.analytics.log_event(to_analytics(user_id, username, event));
    }
    render(app, session, &step.outcome);
    true
}

fn global_find(app: &App, session: &Session, user_id: i64, username: &str, raw: &str) {
    let Some(query) = sanitize_query(raw, app.config.ui.max_query_len) else {
        println!("query is empty or too long after cleanup");
        return;
    };
    let hits = app.store.search(&query, app.config.ui.max_search_results);

    let mut event = AnalyticsEvent::now(user_id, EventType::Search);
    event.username = username.to_string();
    event.lang = session.lang();
    event.query = query.clone();
    event.results_count = hits.len() as u32;
    app.analytics.log_event(event);

    if hits.is_empty() {
        println!("nothing found for \"{query}\"");
        return;
    }
    println!("found {}:", hits.len());
    for (i, hit) in hits.iter().enumerate() {
        println!("{}. {}", i + 1, format_record(hit, true, true));
        println!();
    }
}

fn render(app: &App, session: &Session, outcome: &Outcome) {
    match outcome {
        Outcome::Show(Reply::ChooseLanguage) => println!("choose a language: lang kk | lang ru"),
        Outcome::Show(Reply::CategoryList { categories, .. }) => {
            println!("categories:");
            for name in categories {
                let id = app.mapper.register_category(name);
                println!("  [{id}] {name}");
            }
        }
        Outcome::Show(Reply::SubcategoryList {
            category,
            subcategories,
            ..
        }) => {
            println!("{category}:");
            for name in subcategories {
                let id = app.mapper.register_subcategory(name);
                println!("  [{id}] {name}");
            }
        }
        Outcome::Show(Reply::ResultsPage(info)) => {
            println!(
                "results: {} (page {}/{})",
                info.total, info.page, info.page_count
            );
            println!(
                "{}",
                format_page(
                    session.results(),
                    info.page,
                    app.config.ui.page_size,
                    false,
                    false,
                )
            );
        }
        Outcome::Show(Reply::SearchPrompt) => {
            println!("type a query to search these results, or 'cancel'");
        }
        Outcome::Notice(notice) => println!("{}", notice_text(*notice)),
    }
}

fn notice_text(notice: Notice) -> &'static str {
    match notice {
        Notice::NoCategories => "the catalog has no categories for that language",
        Notice::EmptyCategory => "that category has no subcategories",
        Notice::NoResults => "no terms in that subcategory",
        Notice::NoMatches => "no matches, try another query or 'cancel'",
        Notice::LanguageRequired => "choose a language first (lang kk | lang ru)",
        Notice::NotBrowsing => "open a result list first",
    }
}

fn to_analytics(user_id: i64, username: &str, event: &SessionEvent) -> AnalyticsEvent {
    let mut row = match event {
        SessionEvent::LanguageSelected { lang } => {
            let mut row = AnalyticsEvent::now(user_id, EventType::LanguageSelected);
            row.lang = Some(*lang);
            row
        }
        SessionEvent::CategorySelected { lang, category } => {
            let mut row = AnalyticsEvent::now(user_id, EventType::CategorySelected);
            row.lang = Some(*lang);
            row.category = category.clone();
            row
        }
        SessionEvent::Search {
            lang,
            category,
            subcategory,
            query,
            results_count,
        } => {
            let mut row = AnalyticsEvent::now(user_id, EventType::Search);
            row.lang = Some(*lang);
            row.category = category.clone();
            row.subcategory = subcategory.clone();
            row.query = query.clone();
            row.results_count = *results_count as u32;
            row
        }
    };
    row.username = username.to_string();
    row
}
