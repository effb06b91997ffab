//! In-memory title index with wholesale snapshot replacement.

use std::sync::{Arc, RwLock};

use crate::error::SeekerResult;
use crate::store::CatalogStore;
use crate::types::TitleEntry;

/// Snapshot of (game id, title) pairs used for matching.
///
/// Readers take a cheap `Arc` clone and keep ranking against it even if a
/// refresh lands mid-match; the refresh replaces the whole vector in one
/// swap, so a partially-updated index is never observable. Refresh is an
/// explicit operation (session start, background refresher) and never
/// happens implicitly inside a match.
pub struct TitleIndex {
    snapshot: RwLock<Arc<Vec<TitleEntry>>>,
}

impl TitleIndex {
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Current snapshot. Consistent for the lifetime of the returned Arc.
    pub fn snapshot(&self) -> Arc<Vec<TitleEntry>> {
        Arc::clone(&self.snapshot.read().unwrap())
    }

    /// Replace the snapshot wholesale from the titles listing.
    /// Returns the number of titles loaded.
    pub async fn refresh(&self, store: &dyn CatalogStore) -> SeekerResult<usize> {
        let titles = store.list_titles().await?;
        let count = titles.len();
        *self.snapshot.write().unwrap() = Arc::new(titles);
        Ok(count)
    }
}

impl Default for TitleIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Game, GameVendorLink, PriceObservation, PriceSnapshot, VendorSource};
    use async_trait::async_trait;

    struct TitleStore {
        titles: Vec<(i64, &'static str)>,
    }

    #[async_trait]
    impl CatalogStore for TitleStore {
        async fn list_vendors(&self) -> SeekerResult<Vec<VendorSource>> {
            Ok(Vec::new())
        }

        async fn fetch_game(&self, _game_id: i64) -> SeekerResult<Option<Game>> {
            Ok(None)
        }

        async fn vendor_links(&self, _game_id: i64) -> SeekerResult<Vec<GameVendorLink>> {
            Ok(Vec::new())
        }

        async fn vendor_snapshot(
            &self,
            _vendor_name: &str,
            _local_id: &str,
        ) -> SeekerResult<Option<PriceSnapshot>> {
            Ok(None)
        }

        async fn list_titles(&self) -> SeekerResult<Vec<TitleEntry>> {
            Ok(self
                .titles
                .iter()
                .map(|(id, title)| TitleEntry {
                    game_id: *id,
                    title: title.to_string(),
                })
                .collect())
        }

        async fn history(&self, _game_id: i64) -> SeekerResult<Vec<PriceObservation>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_refresh_replaces_snapshot() {
        let index = TitleIndex::new();
        assert!(index.snapshot().is_empty());

        let count = index
            .refresh(&TitleStore {
                titles: vec![(1, "Half-Life 2"), (2, "Portal 2")],
            })
            .await
            .unwrap();

        assert_eq!(count, 2);
        assert_eq!(index.snapshot().len(), 2);
    }

    #[tokio::test]
    async fn test_held_snapshot_survives_refresh() {
        let index = TitleIndex::new();
        index
            .refresh(&TitleStore {
                titles: vec![(1, "Half-Life 2")],
            })
            .await
            .unwrap();

        // A reader mid-match keeps its view; new readers see the new one
        let held = index.snapshot();
        index
            .refresh(&TitleStore {
                titles: vec![(1, "Half-Life 2"), (2, "Portal 2"), (3, "Left 4 Dead")],
            })
            .await
            .unwrap();

        assert_eq!(held.len(), 1);
        assert_eq!(index.snapshot().len(), 3);
    }
}
