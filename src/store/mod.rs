//! Store seams for the catalog, price, and history collaborators.
//!
//! The aggregation core only ever talks to [`CatalogStore`]; the SQLite
//! backend in [`sqlite`] is the in-repo implementation. A Postgres or
//! HTTP-backed catalog can implement the same trait without touching the
//! aggregation layers.

pub mod sqlite;

use async_trait::async_trait;

use crate::error::SeekerResult;
use crate::types::{Game, GameVendorLink, PriceObservation, PriceSnapshot, TitleEntry, VendorSource};

pub use sqlite::SqliteCatalogStore;

/// Read contract the aggregation core consumes from the persistent store.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Current set of known vendor sources, in registry order.
    ///
    /// A failure here must propagate: callers may never substitute an
    /// empty vendor list, which would turn "source unreachable" into
    /// "game has no prices".
    async fn list_vendors(&self) -> SeekerResult<Vec<VendorSource>>;

    /// One game row, or `None` if the id is unknown.
    async fn fetch_game(&self, game_id: i64) -> SeekerResult<Option<Game>>;

    /// Per-vendor local identifiers for a game, one entry per vendor in
    /// the current vendor set. Returned in a single fan-in query so the
    /// mapping is consistent with the vendor set at call time.
    async fn vendor_links(&self, game_id: i64) -> SeekerResult<Vec<GameVendorLink>>;

    /// Point-in-time snapshot for one (vendor, local id) pair, or `None`
    /// if the vendor has no offer row under that id.
    async fn vendor_snapshot(
        &self,
        vendor_name: &str,
        local_id: &str,
    ) -> SeekerResult<Option<PriceSnapshot>>;

    /// All (id, title) pairs, ordered by id. Backs the title index.
    async fn list_titles(&self) -> SeekerResult<Vec<TitleEntry>>;

    /// All historical observations for a game, ordered ascending by date.
    /// Within one date, rows must come back in insertion order so the
    /// aggregator's last-write-wins merge is deterministic.
    async fn history(&self, game_id: i64) -> SeekerResult<Vec<PriceObservation>>;
}
