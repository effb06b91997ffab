//! Price history aggregation: per-vendor ordered time series.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::{SeekerError, SeekerResult};
use crate::store::CatalogStore;

/// Merges a game's recorded price observations into one ascending series
/// per vendor.
pub struct HistoryAggregator {
    store: Arc<dyn CatalogStore>,
}

impl HistoryAggregator {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Per-vendor series, ascending by date. Duplicate dates within a
    /// vendor collapse to the latest written value. Fails with `NotFound`
    /// only when the game has no observation at all; a vendor with none
    /// is simply absent from the mapping. Unlike price aggregation there
    /// is no per-vendor skip here: any store failure fails the call.
    pub async fn history(
        &self,
        game_id: i64,
    ) -> SeekerResult<HashMap<String, Vec<(NaiveDate, f64)>>> {
        let observations = self.store.history(game_id).await?;
        if observations.is_empty() {
            return Err(SeekerError::NotFound);
        }

        // BTreeMap insert gives both the date ordering and the
        // last-write-wins merge; rows arrive in insertion order per date.
        let mut grouped: HashMap<String, BTreeMap<NaiveDate, f64>> = HashMap::new();
        for obs in observations {
            grouped
                .entry(obs.vendor_name)
                .or_default()
                .insert(obs.date, obs.price);
        }

        Ok(grouped
            .into_iter()
            .map(|(vendor, series)| (vendor, series.into_iter().collect()))
            .collect())
    }
}
