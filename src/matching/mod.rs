//! Fuzzy title matching over an in-memory index snapshot.

pub mod fuzzy;
pub mod index;
pub mod matcher;

pub use index::TitleIndex;
pub use matcher::{find_matches, inline_matches, MatchResult, FALLBACK_LIMIT, INLINE_RESULT_LIMIT};
