//! Error taxonomy for aggregation and matching.
//!
//! Three outcomes matter to callers: the game (or a link) does not exist,
//! a data source could not be reached in time, or a collaborator returned
//! something shaped wrong. Per-vendor variants of the latter two are
//! swallowed inside price aggregation; everything else propagates.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeekerError {
    /// Game or vendor link absent. User-facing, non-fatal.
    #[error("game not found")]
    NotFound,

    /// Store or vendor fetch unreachable or timed out.
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    /// A collaborator returned an unexpected shape (missing field, bad
    /// date, unparseable payload).
    #[error("malformed data from {source}: {detail}")]
    Malformed { source: String, detail: String },
}

impl From<rusqlite::Error> for SeekerError {
    fn from(err: rusqlite::Error) -> Self {
        SeekerError::SourceUnavailable(err.to_string())
    }
}

impl From<reqwest::Error> for SeekerError {
    fn from(err: reqwest::Error) -> Self {
        SeekerError::SourceUnavailable(err.to_string())
    }
}

pub type SeekerResult<T> = Result<T, SeekerError>;
