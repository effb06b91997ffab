//! Substring filtering plus weighted fuzzy ranking over a title index
//! snapshot.

use std::cmp::Ordering;

use super::fuzzy::weighted_score;
use crate::types::{MatchCandidate, TitleEntry};

/// How many suggestions the whole-index fallback returns.
pub const FALLBACK_LIMIT: usize = 5;

/// Result cap for inline-query style transports.
pub const INLINE_RESULT_LIMIT: usize = 50;

/// Outcome of one match run.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchResult {
    /// At least one title contained a query token; full ranked list.
    Direct(Vec<MatchCandidate>),
    /// Nothing contained a token; bounded whole-index suggestions so the
    /// user never hits a zero-result dead end.
    Fallback(Vec<MatchCandidate>),
}

impl MatchResult {
    pub fn candidates(&self) -> &[MatchCandidate] {
        match self {
            MatchResult::Direct(c) | MatchResult::Fallback(c) => c,
        }
    }
}

/// Rank index entries against a free-text query, best first.
///
/// Entries survive the filter when their lowercased title contains *any*
/// whitespace-delimited query word as a substring (not token-boundary).
/// Survivors are ordered by descending weighted fuzzy score; the sort is
/// stable, so ties keep index order and repeated calls with identical
/// inputs produce identical output.
pub fn find_matches(query: &str, index: &[TitleEntry]) -> MatchResult {
    let needle = query.to_lowercase();
    let words: Vec<&str> = needle.split_whitespace().collect();

    let mut candidates: Vec<MatchCandidate> = index
        .iter()
        .filter(|entry| {
            let title = entry.title.to_lowercase();
            words.iter().any(|word| title.contains(word))
        })
        .map(|entry| score_entry(query, entry))
        .collect();

    if candidates.is_empty() {
        return MatchResult::Fallback(fallback_matches(query, index));
    }

    sort_by_score(&mut candidates);
    MatchResult::Direct(candidates)
}

/// Rank the entire index by fuzzy score and keep the top few.
fn fallback_matches(query: &str, index: &[TitleEntry]) -> Vec<MatchCandidate> {
    let mut candidates: Vec<MatchCandidate> =
        index.iter().map(|entry| score_entry(query, entry)).collect();
    sort_by_score(&mut candidates);
    candidates.truncate(FALLBACK_LIMIT);
    candidates
}

/// One-shot match for inline-query transports: direct-or-fallback,
/// capped at `INLINE_RESULT_LIMIT` results.
pub fn inline_matches(query: &str, index: &[TitleEntry]) -> Vec<MatchCandidate> {
    let mut candidates = match find_matches(query, index) {
        MatchResult::Direct(c) | MatchResult::Fallback(c) => c,
    };
    candidates.truncate(INLINE_RESULT_LIMIT);
    candidates
}

fn score_entry(query: &str, entry: &TitleEntry) -> MatchCandidate {
    MatchCandidate {
        game_id: entry.game_id,
        title: entry.title.clone(),
        score: weighted_score(query, &entry.title),
    }
}

fn sort_by_score(candidates: &mut [MatchCandidate]) {
    // Stable: equal scores keep their index order
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
    });
}
