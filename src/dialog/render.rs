//! Plain-text rendering helpers for thin transport adapters.
//!
//! Richer transports (HTML chat, inline cards) will format
//! [`DialogAction`](super::DialogAction) values themselves; these helpers
//! cover line-oriented ones.

use crate::types::{MatchCandidate, PriceSnapshot};

/// Render a consolidated detail view. Snapshots are expected in the order
/// the dialog flow produced them (ascending by price).
pub fn render_detail(snapshots: &[(String, PriceSnapshot)]) -> String {
    let mut out = String::new();
    for (i, (vendor, snap)) in snapshots.iter().enumerate() {
        // Strike-through marker for offers that can't be ordered
        let marker = if snap.stock.is_orderable() { "" } else { " (unavailable)" };
        out.push_str(&format!(
            "{}. {}{}\n   price: {}\n   status: {}\n   {} ({})\n   last checked: {}\n",
            i + 1,
            vendor,
            marker,
            snap.price,
            snap.stock.as_str(),
            snap.title,
            snap.url,
            snap.last_checked.format("%d.%m.%Y"),
        ));
    }
    out.push_str("Spotted a wrong price? Use /report to tell us.\n");
    out
}

/// Render a selectable candidate list, one numbered line per game.
pub fn render_candidates(candidates: &[MatchCandidate]) -> String {
    let mut out = String::new();
    for candidate in candidates {
        out.push_str(&format!("[{}] {}\n", candidate.game_id, candidate.title));
    }
    out
}
