//! Utility functions for contentgraph core
//!
//! Pure helpers shared by the normalizer, path generator and lifecycle code:
//! slugs, content fingerprints, file path resolution and ISO-8601 dates.

pub mod dates;
mod file_path;
mod fingerprint;
mod slug;

pub use dates::{is_date, now_iso, parse_iso_date};
pub use file_path::{DefaultPathResolver, PathResolver};
pub use fingerprint::fingerprint;
pub use slug::slugify;
