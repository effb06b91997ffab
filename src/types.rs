//! Core data model shared by the aggregation and matching layers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A tracked game as listed in the catalog. Rows are created by the
/// ingestion side; this crate only reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: i64,
    pub title: String,
}

/// One known vendor source. The set is dynamic and owned by the store;
/// nothing in this crate hard-codes vendor names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorSource {
    pub name: String,
}

/// Per-vendor local identifier for a game.
///
/// `local_id == None` means the game is not tracked on that vendor, which
/// is an expected state rather than an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameVendorLink {
    pub vendor_name: String,
    pub local_id: Option<String>,
}

/// Stock availability reported by a vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    ComingSoon,
    OutOfStock,
    Unknown,
}

impl StockStatus {
    /// Parse the store's textual status. Unrecognized values degrade to
    /// `Unknown` instead of failing the whole snapshot.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "in_stock" => StockStatus::InStock,
            "coming_soon" => StockStatus::ComingSoon,
            "out_of_stock" => StockStatus::OutOfStock,
            _ => StockStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => "in_stock",
            StockStatus::ComingSoon => "coming_soon",
            StockStatus::OutOfStock => "out_of_stock",
            StockStatus::Unknown => "unknown",
        }
    }

    /// In-stock and coming-soon offers can still be ordered.
    pub fn is_orderable(&self) -> bool {
        matches!(self, StockStatus::InStock | StockStatus::ComingSoon)
    }
}

/// Point-in-time price/stock record for one (vendor, game) pair.
///
/// Built at query time from the vendor offer rows; never persisted by the
/// aggregation core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub local_id: String,
    pub title: String,
    pub price: f64,
    pub stock: StockStatus,
    pub url: String,
    pub last_checked: NaiveDate,
}

/// One historical price point for a (vendor, game) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceObservation {
    pub vendor_name: String,
    pub price: f64,
    pub date: NaiveDate,
}

/// A (game id, title) pair held by the in-memory title index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleEntry {
    pub game_id: i64,
    pub title: String,
}

/// Ranked match produced by the fuzzy matcher. Transient.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate {
    pub game_id: i64,
    pub title: String,
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_status_roundtrip() {
        for status in [
            StockStatus::InStock,
            StockStatus::ComingSoon,
            StockStatus::OutOfStock,
            StockStatus::Unknown,
        ] {
            assert_eq!(StockStatus::parse(status.as_str()), status);
        }
    }

    #[test]
    fn test_stock_status_unknown_fallback() {
        // Unexpected store values must not fail the snapshot
        assert_eq!(StockStatus::parse("available?"), StockStatus::Unknown);
        assert_eq!(StockStatus::parse(""), StockStatus::Unknown);
    }

    #[test]
    fn test_stock_status_orderable() {
        assert!(StockStatus::InStock.is_orderable());
        assert!(StockStatus::ComingSoon.is_orderable());
        assert!(!StockStatus::OutOfStock.is_orderable());
        assert!(!StockStatus::Unknown.is_orderable());
    }
}
