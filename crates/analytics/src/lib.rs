//! # Termbot Analytics
//!
//! Append-only usage event log with windowed aggregation.
//!
//! ## Write path
//!
//! ```text
//! handler ──try_send──> bounded queue ──> drain task ──batch──> CSV log
//!            (never blocks; overflow drops the event with a warning)
//! ```
//!
//! The drain task flushes when a batch fills or after a bounded wait,
//! so events are never held indefinitely; shutdown flushes everything
//! already accepted into the queue. The log file is the sole source of
//! truth for every aggregate — no counters are kept anywhere else.

mod error;
mod event;
mod stats;
mod writer;

pub use error::{AnalyticsError, Result};
pub use event::{AnalyticsEvent, EventType, LOG_HEADER};
pub use stats::{FailedQuery, SearchStats, StatsReport};
pub use writer::{Analytics, AnalyticsConfig};
