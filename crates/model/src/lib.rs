//! # Termbot Model
//!
//! Shared vocabulary for the terminology lookup core: the interface
//! language tag, the catalog record shape, the delimited-file codec used
//! by both the term store and the analytics log, and input validation
//! applied before queries reach the store.

mod csv;
mod lang;
mod record;
mod validate;

pub use csv::{parse_records, write_record};
pub use lang::Lang;
pub use record::TermRecord;
pub use validate::{
    sanitize_query, sanitize_username, validate_days, validate_id, validate_limit,
    MAX_QUERY_LEN, MAX_USERNAME_LEN,
};
