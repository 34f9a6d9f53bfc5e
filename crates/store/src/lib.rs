//! # Termbot Store
//!
//! In-memory term catalog for the lookup service.
//!
//! ## Pipeline
//!
//! ```text
//! CSV file
//!     │
//!     ├──> Loader (trim, drop empty terms, fail soft)
//!     │      └─> Flat record list (source order)
//!     │
//!     └──> Index builder
//!            ├─> categories per language (sorted)
//!            ├─> subcategories per (category, language) (sorted)
//!            └─> term buckets per (category, subcategory, language)
//! ```
//!
//! Lookups are O(1) against the prebuilt indexes; in-bucket search stays
//! proportional to bucket size rather than catalog size. The whole
//! structure is immutable after [`TermStore::load`] returns.

mod mapper;
mod search;
mod store;

pub use mapper::IdMapper;
pub use store::TermStore;
