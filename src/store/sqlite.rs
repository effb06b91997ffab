//! SQLite implementation of the catalog store.
//!
//! The ingestion side (scrapers) writes these tables; this crate only
//! reads them. Vendor sources live in their own table and games link to
//! them through `game_vendor_link`, so the vendor set can grow or shrink
//! without any schema or code change here.

use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};

use super::CatalogStore;
use crate::error::{SeekerError, SeekerResult};
use crate::types::{
    Game, GameVendorLink, PriceObservation, PriceSnapshot, StockStatus, TitleEntry, VendorSource,
};

/// Idempotent schema batch. All statements use IF NOT EXISTS so opening
/// an already-provisioned database is a no-op.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS game (
    id      INTEGER PRIMARY KEY,
    title   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS vendor (
    name        TEXT PRIMARY KEY,
    position    INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS game_vendor_link (
    game_id     INTEGER NOT NULL REFERENCES game(id),
    vendor_name TEXT NOT NULL REFERENCES vendor(name),
    local_id    TEXT,
    PRIMARY KEY (game_id, vendor_name)
);

CREATE TABLE IF NOT EXISTS vendor_offer (
    vendor_name  TEXT NOT NULL,
    local_id     TEXT NOT NULL,
    title        TEXT NOT NULL,
    price        REAL NOT NULL,
    in_stock     TEXT NOT NULL,
    url          TEXT NOT NULL,
    last_checked TEXT NOT NULL,
    PRIMARY KEY (vendor_name, local_id)
);

CREATE TABLE IF NOT EXISTS price_history (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    game_id     INTEGER NOT NULL,
    vendor_name TEXT NOT NULL,
    price       REAL NOT NULL,
    date        TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_price_history_game ON price_history(game_id, date);
"#;

/// SQLite-backed catalog store.
pub struct SqliteCatalogStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteCatalogStore {
    /// Open (or create) the catalog database and run the schema batch.
    pub fn open(db_path: impl AsRef<Path>) -> SeekerResult<Self> {
        let conn = Connection::open(db_path)?;

        // WAL lets the scraper write while aggregation reads
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.execute_batch(SCHEMA)?;

        log::info!("📚 Catalog store opened");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn parse_date(raw: &str, source: &str) -> SeekerResult<NaiveDate> {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| SeekerError::Malformed {
            source: source.to_string(),
            detail: format!("bad date {:?}: {}", raw, e),
        })
    }
}

#[async_trait]
impl CatalogStore for SqliteCatalogStore {
    async fn list_vendors(&self) -> SeekerResult<Vec<VendorSource>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT name FROM vendor ORDER BY position, name")?;
        let vendors = stmt
            .query_map([], |row| {
                Ok(VendorSource { name: row.get(0)? })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(vendors)
    }

    async fn fetch_game(&self, game_id: i64) -> SeekerResult<Option<Game>> {
        let conn = self.conn.lock().unwrap();
        let game = conn
            .query_row(
                "SELECT id, title FROM game WHERE id = ?1",
                [game_id],
                |row| {
                    Ok(Game {
                        id: row.get(0)?,
                        title: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(game)
    }

    async fn vendor_links(&self, game_id: i64) -> SeekerResult<Vec<GameVendorLink>> {
        // Single fan-in query joined against the *current* vendor rows.
        // A vendor added since the last call shows up here immediately;
        // one that was removed is gone, link row or not.
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT v.name, l.local_id
             FROM vendor v
             LEFT JOIN game_vendor_link l
               ON l.vendor_name = v.name AND l.game_id = ?1
             ORDER BY v.position, v.name",
        )?;
        let links = stmt
            .query_map([game_id], |row| {
                Ok(GameVendorLink {
                    vendor_name: row.get(0)?,
                    local_id: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(links)
    }

    async fn vendor_snapshot(
        &self,
        vendor_name: &str,
        local_id: &str,
    ) -> SeekerResult<Option<PriceSnapshot>> {
        let row = {
            let conn = self.conn.lock().unwrap();
            conn.query_row(
                "SELECT local_id, title, price, in_stock, url, last_checked
                 FROM vendor_offer
                 WHERE vendor_name = ?1 AND local_id = ?2",
                [vendor_name, local_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, f64>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                    ))
                },
            )
            .optional()?
        };

        match row {
            None => Ok(None),
            Some((local_id, title, price, in_stock, url, last_checked)) => {
                let last_checked = Self::parse_date(&last_checked, vendor_name)?;
                Ok(Some(PriceSnapshot {
                    local_id,
                    title,
                    price,
                    stock: StockStatus::parse(&in_stock),
                    url,
                    last_checked,
                }))
            }
        }
    }

    async fn list_titles(&self) -> SeekerResult<Vec<TitleEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT id, title FROM game ORDER BY id")?;
        let titles = stmt
            .query_map([], |row| {
                Ok(TitleEntry {
                    game_id: row.get(0)?,
                    title: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(titles)
    }

    async fn history(&self, game_id: i64) -> SeekerResult<Vec<PriceObservation>> {
        let rows = {
            let conn = self.conn.lock().unwrap();
            let mut stmt = conn.prepare(
                "SELECT vendor_name, price, date
                 FROM price_history
                 WHERE game_id = ?1
                 ORDER BY date ASC, id ASC",
            )?;
            let rows = stmt
                .query_map([game_id], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, f64>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                })?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        };

        rows.into_iter()
            .map(|(vendor_name, price, date)| {
                let date = Self::parse_date(&date, &vendor_name)?;
                Ok(PriceObservation {
                    vendor_name,
                    price,
                    date,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    /// Helper to create a seeded catalog on a temp file
    fn create_test_store() -> (NamedTempFile, SqliteCatalogStore) {
        let temp_file = NamedTempFile::new().unwrap();
        let store = SqliteCatalogStore::open(temp_file.path()).unwrap();

        {
            let conn = store.conn.lock().unwrap();
            conn.execute_batch(
                r#"
                INSERT INTO vendor (name, position) VALUES ('sitea', 1), ('siteb', 2);
                INSERT INTO game (id, title) VALUES (1, 'Half-Life 2'), (2, 'Portal 2');
                INSERT INTO game_vendor_link (game_id, vendor_name, local_id)
                    VALUES (1, 'sitea', 'a-17'), (1, 'siteb', NULL);
                INSERT INTO vendor_offer (vendor_name, local_id, title, price, in_stock, url, last_checked)
                    VALUES ('sitea', 'a-17', 'Half-Life 2', 249.0, 'in_stock',
                            'https://sitea.example/hl2', '2024-03-01');
                INSERT INTO price_history (game_id, vendor_name, price, date)
                    VALUES (1, 'sitea', 100.0, '2024-01-01'),
                           (1, 'sitea', 90.0, '2024-01-02');
                "#,
            )
            .unwrap();
        }

        (temp_file, store)
    }

    #[tokio::test]
    async fn test_list_vendors_ordered() {
        let (_temp, store) = create_test_store();
        let vendors = store.list_vendors().await.unwrap();
        let names: Vec<&str> = vendors.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["sitea", "siteb"]);
    }

    #[tokio::test]
    async fn test_vendor_links_cover_current_vendor_set() {
        let (_temp, store) = create_test_store();
        let links = store.vendor_links(1).await.unwrap();

        // One entry per vendor in the registry, null link preserved
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].vendor_name, "sitea");
        assert_eq!(links[0].local_id.as_deref(), Some("a-17"));
        assert_eq!(links[1].vendor_name, "siteb");
        assert_eq!(links[1].local_id, None);
    }

    #[tokio::test]
    async fn test_vendor_links_track_vendor_set_changes() {
        let (_temp, store) = create_test_store();

        {
            let conn = store.conn.lock().unwrap();
            conn.execute("INSERT INTO vendor (name, position) VALUES ('sitec', 3)", [])
                .unwrap();
        }

        // The new vendor appears in the fan-in result without any link row
        let links = store.vendor_links(1).await.unwrap();
        assert_eq!(links.len(), 3);
        assert_eq!(links[2].vendor_name, "sitec");
        assert_eq!(links[2].local_id, None);
    }

    #[tokio::test]
    async fn test_vendor_snapshot_found_and_absent() {
        let (_temp, store) = create_test_store();

        let snap = store.vendor_snapshot("sitea", "a-17").await.unwrap().unwrap();
        assert_eq!(snap.title, "Half-Life 2");
        assert_eq!(snap.price, 249.0);
        assert_eq!(snap.stock, StockStatus::InStock);
        assert_eq!(snap.last_checked, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());

        assert!(store.vendor_snapshot("sitea", "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_vendor_snapshot_malformed_date() {
        let (_temp, store) = create_test_store();

        {
            let conn = store.conn.lock().unwrap();
            conn.execute(
                "INSERT INTO vendor_offer (vendor_name, local_id, title, price, in_stock, url, last_checked)
                 VALUES ('siteb', 'b-9', 'Broken', 1.0, 'in_stock', 'https://b/9', 'yesterday')",
                [],
            )
            .unwrap();
        }

        let err = store.vendor_snapshot("siteb", "b-9").await.unwrap_err();
        assert!(matches!(err, SeekerError::Malformed { .. }));
    }

    #[tokio::test]
    async fn test_fetch_game() {
        let (_temp, store) = create_test_store();
        assert_eq!(store.fetch_game(1).await.unwrap().unwrap().title, "Half-Life 2");
        assert!(store.fetch_game(404).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_history_ordering() {
        let (_temp, store) = create_test_store();
        let rows = store.history(1).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].date < rows[1].date);
        assert_eq!(rows[1].price, 90.0);
    }

    #[tokio::test]
    async fn test_history_empty_for_unknown_game() {
        let (_temp, store) = create_test_store();
        assert!(store.history(404).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_titles() {
        let (_temp, store) = create_test_store();
        let titles = store.list_titles().await.unwrap();
        assert_eq!(titles.len(), 2);
        assert_eq!(titles[0].game_id, 1);
        assert_eq!(titles[1].title, "Portal 2");
    }
}
