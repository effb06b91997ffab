//! Background title index refresher.

use std::sync::Arc;

use tokio::time::{interval, Duration};

use crate::matching::TitleIndex;
use crate::store::CatalogStore;

/// Periodically replace the title index snapshot from the titles listing.
///
/// A failed refresh keeps the previous snapshot; matching degrades to
/// slightly stale titles instead of an empty index. Runs until the task
/// is dropped.
pub async fn title_refresh_task(
    index: Arc<TitleIndex>,
    store: Arc<dyn CatalogStore>,
    refresh_interval_ms: u64,
) {
    log::info!(
        "⏰ Starting title refresh task (interval: {}ms)",
        refresh_interval_ms
    );

    let mut timer = interval(Duration::from_millis(refresh_interval_ms));

    loop {
        timer.tick().await;

        match index.refresh(store.as_ref()).await {
            Ok(count) => {
                log::debug!("✅ Title index refreshed ({} titles)", count);
            }
            Err(e) => {
                log::warn!("⚠️  Title refresh failed, keeping previous snapshot: {}", e);
            }
        }
    }
}
