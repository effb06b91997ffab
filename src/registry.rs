//! Vendor registry: the single source of truth for which vendor sources
//! exist at call time.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::SeekerResult;
use crate::store::CatalogStore;
use crate::types::VendorSource;

/// Resolves the current vendor set from the store.
///
/// Aggregation must re-resolve per call rather than caching a static
/// vendor list, because the set changes independently of this code.
pub struct VendorRegistry {
    store: Arc<dyn CatalogStore>,
}

impl VendorRegistry {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Current vendor sources, deduplicated by name (first occurrence
    /// wins, order preserved). Store failures propagate; an unreachable
    /// registry must never look like an empty one.
    pub async fn list_vendors(&self) -> SeekerResult<Vec<VendorSource>> {
        let vendors = self.store.list_vendors().await?;

        let mut seen = HashSet::new();
        Ok(vendors
            .into_iter()
            .filter(|v| seen.insert(v.name.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SeekerError;
    use async_trait::async_trait;
    use crate::types::{Game, GameVendorLink, PriceObservation, PriceSnapshot, TitleEntry};

    /// Store stub returning a fixed (possibly duplicated) vendor list
    struct StubStore {
        vendors: Vec<&'static str>,
        fail: bool,
    }

    #[async_trait]
    impl CatalogStore for StubStore {
        async fn list_vendors(&self) -> SeekerResult<Vec<VendorSource>> {
            if self.fail {
                return Err(SeekerError::SourceUnavailable("stub down".to_string()));
            }
            Ok(self
                .vendors
                .iter()
                .map(|name| VendorSource {
                    name: name.to_string(),
                })
                .collect())
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
            Ok(Vec::new())
        }

        async fn history(&self, _game_id: i64) -> SeekerResult<Vec<PriceObservation>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_duplicates_deduplicated_first_wins() {
        let registry = VendorRegistry::new(Arc::new(StubStore {
            vendors: vec!["sitea", "siteb", "sitea"],
            fail: false,
        }));

        let vendors = registry.list_vendors().await.unwrap();
        let names: Vec<&str> = vendors.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["sitea", "siteb"]);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let registry = VendorRegistry::new(Arc::new(StubStore {
            vendors: vec![],
            fail: true,
        }));

        let err = registry.list_vendors().await.unwrap_err();
        assert!(matches!(err, SeekerError::SourceUnavailable(_)));
    }
}
