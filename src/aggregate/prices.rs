//! Current-price aggregation: fan a game lookup out across every vendor
//! that tracks it and join the snapshots into one comparison view.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::timeout;

use crate::error::{SeekerError, SeekerResult};
use crate::registry::VendorRegistry;
use crate::store::CatalogStore;
use crate::types::PriceSnapshot;

/// Aggregates per-vendor price snapshots for one game.
///
/// Per-vendor fetches run concurrently, one task per linked vendor, each
/// bounded by `fetch_timeout`. A single vendor failing or timing out is
/// logged and skipped; the rest of the aggregation proceeds, so the user
/// still gets a smaller-than-expected but useful price list.
pub struct PriceAggregator {
    store: Arc<dyn CatalogStore>,
    registry: VendorRegistry,
    fetch_timeout: Duration,
}

impl PriceAggregator {
    pub fn new(store: Arc<dyn CatalogStore>, fetch_timeout: Duration) -> Self {
        let registry = VendorRegistry::new(Arc::clone(&store));
        Self {
            store,
            registry,
            fetch_timeout,
        }
    }

    /// Build the vendor -> snapshot comparison for `game_id`.
    ///
    /// Fails with `NotFound` if the game itself is unknown. Vendors with
    /// a null link are skipped silently (the game simply isn't tracked
    /// there). The result only ever contains vendors that were in the
    /// registry, with a non-null link, at call time.
    pub async fn aggregate(&self, game_id: i64) -> SeekerResult<HashMap<String, PriceSnapshot>> {
        // Resolve the vendor set first; an unreachable registry aborts the
        // whole aggregation rather than degrading to "no prices".
        let vendors = self.registry.list_vendors().await?;

        if self.store.fetch_game(game_id).await?.is_none() {
            return Err(SeekerError::NotFound);
        }

        // One fan-in query for all links, keyed by the current vendor set
        let links = self.store.vendor_links(game_id).await?;
        let link_by_vendor: HashMap<String, Option<String>> = links
            .into_iter()
            .map(|l| (l.vendor_name, l.local_id))
            .collect();

        let mut tasks: JoinSet<(String, Option<SeekerResult<Option<PriceSnapshot>>>)> =
            JoinSet::new();

        for vendor in vendors {
            let local_id = match link_by_vendor.get(&vendor.name) {
                Some(Some(id)) => id.clone(),
                _ => continue, // not tracked on this vendor
            };

            let store = Arc::clone(&self.store);
            let fetch_timeout = self.fetch_timeout;
            let vendor_name = vendor.name.clone();

            tasks.spawn(async move {
                match timeout(fetch_timeout, store.vendor_snapshot(&vendor_name, &local_id)).await {
                    Ok(fetched) => (vendor_name, Some(fetched)),
                    Err(_) => (vendor_name, None), // timed out
                }
            });
        }

        let mut result = HashMap::new();
        while let Some(joined) = tasks.join_next().await {
            let (vendor_name, fetched) = match joined {
                Ok(output) => output,
                Err(e) => {
                    log::warn!("⚠️  Vendor fetch task failed: {}", e);
                    continue;
                }
            };

            match fetched {
                Some(Ok(Some(snapshot))) => {
                    result.insert(vendor_name, snapshot);
                }
                Some(Ok(None)) => {
                    // Link row points at an offer that no longer exists;
                    // treat like any other per-vendor failure.
                    log::warn!("⚠️  Skipping vendor {}: linked offer missing", vendor_name);
                }
                Some(Err(e)) => {
                    log::warn!("⚠️  Skipping vendor {}: {}", vendor_name, e);
                }
                None => {
                    log::warn!("⚠️  Skipping vendor {}: fetch timed out", vendor_name);
                }
            }
        }

        Ok(result)
    }
}
