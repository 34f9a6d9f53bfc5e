use crate::page::PageInfo;
use serde::{Deserialize, Serialize};
use termbot_model::{Lang, TermRecord};
use termbot_store::TermStore;

/// The active result set being paged through, with everything that was
/// selected to produce it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsView {
    pub lang: Lang,
    pub category: String,
    pub subcategory: String,
    pub results: Vec<TermRecord>,
    /// 1-based page cursor.
    pub page: usize,
}

/// Navigation position, one variant per state with only the fields that
/// state can legally carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionState {
    ChoosingLanguage,
    ChoosingCategory {
        lang: Lang,
    },
    ChoosingSubcategory {
        lang: Lang,
        category: String,
    },
    ViewingResults(ResultsView),
    /// Search mode keeps the prior view so "cancel" can restore it.
    SearchingInResults {
        prior: ResultsView,
    },
}

/// What the front-end should show after a successful transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    ChooseLanguage,
    CategoryList {
        lang: Lang,
        categories: Vec<String>,
    },
    SubcategoryList {
        lang: Lang,
        category: String,
        subcategories: Vec<String>,
    },
    ResultsPage(PageInfo),
    SearchPrompt,
}

/// Stay-in-place conditions. None of these are errors; the session
/// keeps its prior state and the caller surfaces an inline notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// No categories exist for the chosen language (empty catalog).
    NoCategories,
    /// The chosen category has no subcategories.
    EmptyCategory,
    /// The chosen subcategory has no terms.
    NoResults,
    /// In-filter search matched nothing.
    NoMatches,
    /// A language must be chosen before browsing.
    LanguageRequired,
    /// The trigger only makes sense while viewing or searching results.
    NotBrowsing,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Show(Reply),
    Notice(Notice),
}

/// Event emitted by a transition for the analytics collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    LanguageSelected {
        lang: Lang,
    },
    CategorySelected {
        lang: Lang,
        category: String,
    },
    Search {
        lang: Lang,
        category: String,
        subcategory: String,
        query: String,
        results_count: usize,
    },
}

/// Result of driving the machine one step.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub outcome: Outcome,
    pub event: Option<SessionEvent>,
}

impl Step {
    fn show(reply: Reply) -> Step {
        Step {
            outcome: Outcome::Show(reply),
            event: None,
        }
    }

    fn notice(notice: Notice) -> Step {
        Step {
            outcome: Outcome::Notice(notice),
            event: None,
        }
    }

    fn with_event(mut self, event: SessionEvent) -> Step {
        self.event = Some(event);
        self
    }
}

/// One user's navigation session. Created implicitly on first
/// interaction; every operation is total — undefined triggers and empty
/// data sets produce a [`Notice`], never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    state: SessionState,
    page_size: usize,
    max_filtered_results: usize,
}

impl Session {
    #[must_use]
    pub fn new(page_size: usize, max_filtered_results: usize) -> Session {
        Session {
            state: SessionState::ChoosingLanguage,
            page_size,
            max_filtered_results,
        }
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The interface language, once one has been chosen.
    #[must_use]
    pub fn lang(&self) -> Option<Lang> {
        match &self.state {
            SessionState::ChoosingLanguage => None,
            SessionState::ChoosingCategory { lang }
            | SessionState::ChoosingSubcategory { lang, .. } => Some(*lang),
            SessionState::ViewingResults(view)
            | SessionState::SearchingInResults { prior: view } => Some(view.lang),
        }
    }

    /// The active result list; empty outside of viewing/searching.
    #[must_use]
    pub fn results(&self) -> &[TermRecord] {
        match &self.state {
            SessionState::ViewingResults(view)
            | SessionState::SearchingInResults { prior: view } => &view.results,
            _ => &[],
        }
    }

    /// Page metadata for the active result list.
    #[must_use]
    pub fn page_info(&self) -> Option<PageInfo> {
        match &self.state {
            SessionState::ViewingResults(view)
            | SessionState::SearchingInResults { prior: view } => {
                Some(PageInfo::new(view.results.len(), view.page, self.page_size))
            }
            _ => None,
        }
    }

    /// Language selection is honored from any state; it restarts
    /// browsing at the category list for that language.
    pub fn select_language(&mut self, store: &TermStore, lang: Lang) -> Step {
        let event = SessionEvent::LanguageSelected { lang };
        let categories = store.categories(lang).to_vec();
        if categories.is_empty() {
            return Step::notice(Notice::NoCategories).with_event(event);
        }
        self.state = SessionState::ChoosingCategory { lang };
        Step::show(Reply::CategoryList { lang, categories }).with_event(event)
    }

    /// Selecting a category with no subcategories stays put and surfaces
    /// [`Notice::EmptyCategory`]; the selection event is only emitted on
    /// an actual advance.
    pub fn select_category(&mut self, store: &TermStore, category: &str) -> Step {
        let Some(lang) = self.lang() else {
            return Step::notice(Notice::LanguageRequired);
        };
        let subcategories = store.subcategories(category, lang).to_vec();
        if subcategories.is_empty() {
            return Step::notice(Notice::EmptyCategory);
        }
        self.state = SessionState::ChoosingSubcategory {
            lang,
            category: category.to_string(),
        };
        Step::show(Reply::SubcategoryList {
            lang,
            category: category.to_string(),
            subcategories,
        })
        .with_event(SessionEvent::CategorySelected {
            lang,
            category: category.to_string(),
        })
    }

    pub fn select_subcategory(&mut self, store: &TermStore, subcategory: &str) -> Step {
        let (lang, category) = match &self.state {
            SessionState::ChoosingSubcategory { lang, category } => (*lang, category.clone()),
            SessionState::ViewingResults(view)
            | SessionState::SearchingInResults { prior: view } => {
                (view.lang, view.category.clone())
            }
            _ => return Step::notice(Notice::LanguageRequired),
        };

        let terms = store.terms(&category, subcategory, lang);
        if terms.is_empty() {
            return Step::notice(Notice::NoResults);
        }

        let view = ResultsView {
            lang,
            category,
            subcategory: subcategory.to_string(),
            results: terms.to_vec(),
            page: 1,
        };
        let info = PageInfo::new(view.results.len(), 1, self.page_size);
        self.state = SessionState::ViewingResults(view);
        Step::show(Reply::ResultsPage(info))
    }

    /// Paging past either boundary clamps; it never wraps or errors.
    pub fn next_page(&mut self) -> Step {
        self.turn_page(1)
    }

    pub fn prev_page(&mut self) -> Step {
        self.turn_page(-1)
    }

    fn turn_page(&mut self, delta: i64) -> Step {
        let page_size = self.page_size;
        let SessionState::ViewingResults(view) = &mut self.state else {
            return Step::notice(Notice::NotBrowsing);
        };
        let count = crate::page::page_count(view.results.len(), page_size).max(1);
        let target = view.page as i64 + delta;
        view.page = target.clamp(1, count as i64) as usize;
        let info = PageInfo::new(view.results.len(), view.page, page_size);
        Step::show(Reply::ResultsPage(info))
    }

    /// Switch to in-filter search mode; the current view is retained so
    /// a cancelled search can restore it.
    pub fn start_search(&mut self) -> Step {
        let state = std::mem::replace(&mut self.state, SessionState::ChoosingLanguage);
        match state {
            SessionState::ViewingResults(view) => {
                self.state = SessionState::SearchingInResults { prior: view };
                Step::show(Reply::SearchPrompt)
            }
            other => {
                self.state = other;
                Step::notice(Notice::NotBrowsing)
            }
        }
    }

    /// Run an in-filter search. On a hit the result set is replaced and
    /// the page cursor resets to 1; on an empty match the session stays
    /// in search mode with the prior view intact.
    pub fn submit_search(&mut self, store: &TermStore, query: &str) -> Step {
        let SessionState::SearchingInResults { prior } = &self.state else {
            return Step::notice(Notice::NotBrowsing);
        };

        let hits: Vec<TermRecord> = store
            .search_in_filtered(
                query,
                &prior.category,
                &prior.subcategory,
                prior.lang,
                self.max_filtered_results,
            )
            .into_iter()
            .cloned()
            .collect();

        let event = SessionEvent::Search {
            lang: prior.lang,
            category: prior.category.clone(),
            subcategory: prior.subcategory.clone(),
            query: query.trim().to_string(),
            results_count: hits.len(),
        };

        if hits.is_empty() {
            return Step::notice(Notice::NoMatches).with_event(event);
        }

        let view = ResultsView {
            lang: prior.lang,
            category: prior.category.clone(),
            subcategory: prior.subcategory.clone(),
            results: hits,
            page: 1,
        };
        let info = PageInfo::new(view.results.len(), 1, self.page_size);
        self.state = SessionState::ViewingResults(view);
        Step::show(Reply::ResultsPage(info)).with_event(event)
    }

    /// Abandon search mode and restore the result set and page cursor
    /// that were active before the search started.
    pub fn cancel_search(&mut self) -> Step {
        let state = std::mem::replace(&mut self.state, SessionState::ChoosingLanguage);
        match state {
            SessionState::SearchingInResults { prior } => {
                let info = PageInfo::new(prior.results.len(), prior.page, self.page_size);
                self.state = SessionState::ViewingResults(prior);
                Step::show(Reply::ResultsPage(info))
            }
            other => {
                self.state = other;
                Step::notice(Notice::NotBrowsing)
            }
        }
    }

    /// "Home": back to the category list, clearing every selection.
    /// Without a chosen language it falls back to the language prompt.
    pub fn go_home(&mut self, store: &TermStore) -> Step {
        let Some(lang) = self.lang() else {
            self.state = SessionState::ChoosingLanguage;
            return Step::show(Reply::ChooseLanguage);
        };
        let categories = store.categories(lang).to_vec();
        if categories.is_empty() {
            return Step::notice(Notice::NoCategories);
        }
        self.state = SessionState::ChoosingCategory { lang };
        Step::show(Reply::CategoryList { lang, categories })
    }

    /// One logical step up. From the result list (or an in-progress
    /// search) this returns to the subcategory list, discarding any
    /// search state; "cancel search" is the path that restores results.
    pub fn go_back(&mut self, store: &TermStore) -> Step {
        let state = std::mem::replace(&mut self.state, SessionState::ChoosingLanguage);
        match state {
            SessionState::ViewingResults(view)
            | SessionState::SearchingInResults { prior: view } => {
                let subcategories = store.subcategories(&view.category, view.lang).to_vec();
                if subcategories.is_empty() {
                    // The catalog changed under us; fall back to the
                    // category list.
                    self.state = SessionState::ChoosingCategory { lang: view.lang };
                    return self.go_home(store);
                }
                self.state = SessionState::ChoosingSubcategory {
                    lang: view.lang,
                    category: view.category.clone(),
                };
                Step::show(Reply::SubcategoryList {
                    lang: view.lang,
                    category: view.category,
                    subcategories,
                })
            }
            SessionState::ChoosingSubcategory { lang, .. } => {
                self.state = SessionState::ChoosingCategory { lang };
                self.go_home(store)
            }
            other => {
                self.state = other;
                self.go_home(store)
            }
        }
    }

    /// Explicit restart: the whole session resets to the language
    /// prompt.
    pub fn restart(&mut self) -> Step {
        self.state = SessionState::ChoosingLanguage;
        Step::show(Reply::ChooseLanguage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use termbot_model::{Lang, TermRecord};
    use termbot_store::TermStore;

    const PAGE: usize = 10;
    const MAX_FILTERED: usize = 20;

    fn rec(term: &str, desc: &str, cat: &str, sub: &str, lang: Lang) -> TermRecord {
        TermRecord {
            term: term.to_string(),
            description: desc.to_string(),
            category: cat.to_string(),
            subcategory: sub.to_string(),
            lang,
        }
    }

    fn store() -> TermStore {
        let mut records = Vec::new();
        for i in 1..=25 {
            records.push(rec(
                &format!("термин{i}"),
                "сипаттама",
                "Денсаулық",
                "Емхана",
                Lang::Kk,
            ));
        }
        records.push(rec("сөз", "сипаттама", "Денсаулық", "Емхана", Lang::Kk));
        records.push(rec("право", "описание", "Право", "Суд", Lang::Ru));
        TermStore::from_records(records)
    }

    fn browsing_session(store: &TermStore) -> Session {
        let mut session = Session::new(PAGE, MAX_FILTERED);
        session.select_language(store, Lang::Kk);
        session.select_category(store, "Денсаулық");
        session.select_subcategory(store, "Емхана");
        session
    }

    #[test]
    fn language_selection_advances_and_emits_event() {
        let store = store();
        let mut session = Session::new(PAGE, MAX_FILTERED);
        let step = session.select_language(&store, Lang::Kk);
        assert!(matches!(
            step.outcome,
            Outcome::Show(Reply::CategoryList { lang: Lang::Kk, .. })
        ));
        assert_eq!(
            step.event,
            Some(SessionEvent::LanguageSelected { lang: Lang::Kk })
        );
    }

    #[test]
    fn empty_category_stays_in_place() {
        let store = store();
        let mut session = Session::new(PAGE, MAX_FILTERED);
        session.select_language(&store, Lang::Ru);
        let step = session.select_category(&store, "Жоқ категория");
        assert_eq!(step.outcome, Outcome::Notice(Notice::EmptyCategory));
        assert_eq!(step.event, None);
        assert!(matches!(
            session.state(),
            SessionState::ChoosingCategory { lang: Lang::Ru }
        ));
    }

    #[test]
    fn category_without_language_is_rejected() {
        let store = store();
        let mut session = Session::new(PAGE, MAX_FILTERED);
        let step = session.select_category(&store, "Денсаулық");
        assert_eq!(step.outcome, Outcome::Notice(Notice::LanguageRequired));
    }

    #[test]
    fn subcategory_selection_resets_page_to_one() {
        let store = store();
        let session = browsing_session(&store);
        let info = session.page_info().expect("viewing results");
        assert_eq!(info.page, 1);
        assert_eq!(info.total, 26);
        assert_eq!(info.page_count, 3);
        assert!(info.has_next);
        assert!(!info.has_prev);
    }

    #[test]
    fn empty_subcategory_stays_in_place() {
        let store = store();
        let mut session = Session::new(PAGE, MAX_FILTERED);
        session.select_language(&store, Lang::Kk);
        session.select_category(&store, "Денсаулық");
        let step = session.select_subcategory(&store, "Жоқ");
        assert_eq!(step.outcome, Outcome::Notice(Notice::NoResults));
        assert!(matches!(
            session.state(),
            SessionState::ChoosingSubcategory { .. }
        ));
    }

    #[test]
    fn paging_clamps_at_both_boundaries() {
        let store = store();
        let mut session = browsing_session(&store);
        let step = session.prev_page();
        let Outcome::Show(Reply::ResultsPage(info)) = step.outcome else {
            panic!("expected page reply");
        };
        assert_eq!(info.page, 1);

        session.next_page();
        session.next_page();
        let step = session.next_page();
        let Outcome::Show(Reply::ResultsPage(info)) = step.outcome else {
            panic!("expected page reply");
        };
        assert_eq!(info.page, 3);
    }

    #[test]
    fn search_replaces_results_and_resets_page() {
        let store = store();
        let mut session = browsing_session(&store);
        session.next_page();
        session.start_search();
        let step = session.submit_search(&store, "сөз");
        let Outcome::Show(Reply::ResultsPage(info)) = step.outcome else {
            panic!("expected page reply");
        };
        assert_eq!(info.page, 1);
        assert_eq!(info.total, 1);
        assert_eq!(session.results()[0].term, "сөз");
        match step.event {
            Some(SessionEvent::Search {
                query,
                results_count,
                ..
            }) => {
                assert_eq!(query, "сөз");
                assert_eq!(results_count, 1);
            }
            other => panic!("expected search event, got {other:?}"),
        }
    }

    #[test]
    fn empty_search_keeps_search_mode_and_reports_zero() {
        let store = store();
        let mut session = browsing_session(&store);
        session.start_search();
        let step = session.submit_search(&store, "жоқ-сөз-123");
        assert_eq!(step.outcome, Outcome::Notice(Notice::NoMatches));
        match step.event {
            Some(SessionEvent::Search { results_count, .. }) => assert_eq!(results_count, 0),
            other => panic!("expected search event, got {other:?}"),
        }
        assert!(matches!(
            session.state(),
            SessionState::SearchingInResults { .. }
        ));
    }

    #[test]
    fn cancel_restores_prior_results_and_page() {
        let store = store();
        let mut session = browsing_session(&store);
        session.next_page();
        session.start_search();
        let step = session.cancel_search();
        let Outcome::Show(Reply::ResultsPage(info)) = step.outcome else {
            panic!("expected page reply");
        };
        assert_eq!(info.page, 2);
        assert_eq!(info.total, 26);
    }

    #[test]
    fn back_from_results_returns_to_subcategories() {
        let store = store();
        let mut session = browsing_session(&store);
        let step = session.go_back(&store);
        assert!(matches!(
            step.outcome,
            Outcome::Show(Reply::SubcategoryList { .. })
        ));
        assert!(matches!(
            session.state(),
            SessionState::ChoosingSubcategory { .. }
        ));
    }

    #[test]
    fn back_from_search_discards_search_mode() {
        let store = store();
        let mut session = browsing_session(&store);
        session.start_search();
        let step = session.go_back(&store);
        assert!(matches!(
            step.outcome,
            Outcome::Show(Reply::SubcategoryList { .. })
        ));
    }

    #[test]
    fn home_clears_selection_but_keeps_language() {
        let store = store();
        let mut session = browsing_session(&store);
        let step = session.go_home(&store);
        assert!(matches!(
            step.outcome,
            Outcome::Show(Reply::CategoryList { lang: Lang::Kk, .. })
        ));
        assert!(session.results().is_empty());
    }

    #[test]
    fn restart_resets_everything() {
        let store = store();
        let mut session = browsing_session(&store);
        let step = session.restart();
        assert_eq!(step.outcome, Outcome::Show(Reply::ChooseLanguage));
        assert_eq!(session.state(), &SessionState::ChoosingLanguage);
        assert_eq!(session.lang(), None);
    }

    #[test]
    fn paging_outside_results_is_a_notice() {
        let store = store();
        let mut session = Session::new(PAGE, MAX_FILTERED);
        session.select_language(&store, Lang::Kk);
        assert_eq!(
            session.next_page().outcome,
            Outcome::Notice(Notice::NotBrowsing)
        );
        assert_eq!(
            session.start_search().outcome,
            Outcome::Notice(Notice::NotBrowsing)
        );
    }
}
