//! # Termbot Session
//!
//! Per-user conversation state machine plus the pure result
//! formatter/paginator.
//!
//! ## Navigation
//!
//! ```text
//! choosing_language ──> choosing_category ──> choosing_subcategory
//!                                                    │
//!                                              viewing_results <──┐
//!                                                    │            │
//!                                           searching_in_results ─┘
//! ```
//!
//! Transitions whose target data set comes back empty do not advance;
//! the session stays put and the caller surfaces an inline notice, so a
//! user is never shown an empty list of options. The surrounding
//! dispatcher must keep at most one in-flight request per user; a
//! [`Session`] is not a shared thread-safe structure.

mod format;
mod page;
mod state;

pub use format::{escape_markup, format_page, format_record};
pub use page::{page_count, PageInfo};
pub use state::{Notice, Outcome, Reply, ResultsView, Session, SessionEvent, SessionState, Step};
