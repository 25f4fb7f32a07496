//! # Coinwatch Store
//!
//! `DuckDB`-based durable storage for the coinwatch watch-list and its price
//! time series.
//!
//! ## Overview
//!
//! Two related tables back the whole system:
//!
//! | Table | Description |
//! |-------|-------------|
//! | `assets` | Watched symbols with an `active` flag |
//! | `samples` | Append-only (asset, price, timestamp) observations |
//!
//! All statements are parameterized; user-provided symbols are never
//! interpolated into SQL. Nearest-timestamp resolution is an explicit
//! `ORDER BY ABS(ts - ?)` over the asset's series, with a documented,
//! stable tie-break: smaller distance first, then the earlier timestamp,
//! then the earlier-inserted row.
//!
//! Samples are retained indefinitely; there is no compaction or retention
//! policy.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use coinwatch_store::{PriceDb, StoreConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = PriceDb::open_default()?;
//!     db.activate_asset("bitcoin")?;
//!     for asset in db.active_assets()? {
//!         println!("watching {}", asset.symbol);
//!     }
//!     Ok(())
//! }
//! ```

pub mod migrations;
pub mod pool;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use ::duckdb::ToSql;
use thiserror::Error;

pub use pool::{ConnectionPool, PooledConnection};

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `DuckDB` database error.
    #[error(transparent)]
    DuckDb(#[from] ::duckdb::Error),

    /// I/O error (file system operations).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A persisted row no longer satisfies a domain invariant.
    #[error("invalid stored row: {0}")]
    InvalidRow(String),
}

/// Configuration for the store database.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Root directory for coinwatch data.
    pub home: PathBuf,
    /// Path to the `DuckDB` database file.
    pub db_path: PathBuf,
    /// Maximum number of idle connections kept for reuse.
    pub max_pool_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        let home = resolve_coinwatch_home();
        let db_path = home.join("coinwatch.duckdb");
        Self {
            home,
            db_path,
            max_pool_size: 4,
        }
    }
}

/// A watched asset row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRow {
    pub id: i64,
    pub symbol: String,
    pub active: bool,
}

/// One recorded price observation.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRow {
    pub price: f64,
    pub ts: i64,
}

/// The durable watch-list and price series store.
#[derive(Clone)]
pub struct PriceDb {
    config: StoreConfig,
    pool: ConnectionPool,
}

impl PriceDb {
    /// Open a store with default configuration.
    pub fn open_default() -> Result<Self, StoreError> {
        Self::open(StoreConfig::default())
    }

    /// Open a store with the specified configuration and apply migrations.
    pub fn open(config: StoreConfig) -> Result<Self, StoreError> {
        if let Some(parent) = config.db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let pool = ConnectionPool::new(config.db_path.clone(), config.max_pool_size);
        let db = Self { config, pool };
        db.initialize()?;
        Ok(db)
    }

    /// Apply schema migrations.
    pub fn initialize(&self) -> Result<(), StoreError> {
        let connection = self.pool.acquire()?;
        migrations::apply_migrations(&connection)?;
        Ok(())
    }

    /// Get the path to the database file.
    pub fn db_path(&self) -> &Path {
        self.pool.db_path()
    }

    /// Get the data root directory.
    pub fn home(&self) -> &Path {
        self.config.home.as_path()
    }

    /// Mark a symbol as watched.
    ///
    /// An existing row (active or not) is flipped back to active; an unknown
    /// symbol gets a fresh row. Exactly one row per symbol either way.
    pub fn activate_asset(&self, symbol: &str) -> Result<(), StoreError> {
        let connection = self.pool.acquire()?;

        let params: [&dyn ToSql; 1] = [&symbol];
        let updated = connection.execute(
            "UPDATE assets SET active = TRUE, updated_at = CURRENT_TIMESTAMP WHERE symbol = ?",
            params.as_slice(),
        )?;

        if updated == 0 {
            connection.execute(
                "INSERT INTO assets (symbol, active) VALUES (?, TRUE)",
                params.as_slice(),
            )?;
        }

        Ok(())
    }

    /// Delete a symbol and every sample it owns.
    ///
    /// Samples go first, then the asset, in one transaction, so a failure
    /// never leaves orphaned samples. Returns `false` when the symbol is
    /// unknown.
    pub fn remove_asset(&self, symbol: &str) -> Result<bool, StoreError> {
        let connection = self.pool.acquire()?;

        let params: [&dyn ToSql; 1] = [&symbol];
        let asset_id = optional(connection.query_row(
            "SELECT id FROM assets WHERE symbol = ?",
            params.as_slice(),
            |row| row.get::<_, i64>(0),
        ))?;
        let Some(asset_id) = asset_id else {
            return Ok(false);
        };

        connection.execute_batch("BEGIN TRANSACTION")?;
        let result = (|| -> Result<(), StoreError> {
            let params: [&dyn ToSql; 1] = [&asset_id];
            connection.execute("DELETE FROM samples WHERE asset_id = ?", params.as_slice())?;
            connection.execute("DELETE FROM assets WHERE id = ?", params.as_slice())?;
            Ok(())
        })();

        match result {
            Ok(()) => {
                connection.execute_batch("COMMIT")?;
                Ok(true)
            }
            Err(error) => {
                let _ = connection.execute_batch("ROLLBACK");
                Err(error)
            }
        }
    }

    /// List every asset currently flagged active, in unspecified order.
    pub fn active_assets(&self) -> Result<Vec<AssetRow>, StoreError> {
        let connection = self.pool.acquire()?;

        let mut statement =
            connection.prepare("SELECT id, symbol, active FROM assets WHERE active")?;
        let rows = statement.query_map([], |row| {
            Ok(AssetRow {
                id: row.get(0)?,
                symbol: row.get(1)?,
                active: row.get(2)?,
            })
        })?;

        let mut assets = Vec::new();
        for row in rows {
            assets.push(row?);
        }
        Ok(assets)
    }

    /// Append one immutable sample. No dedup; repeated timestamps for the
    /// same asset are all retained.
    pub fn append_sample(&self, asset_id: i64, price: f64, ts: i64) -> Result<(), StoreError> {
        let connection = self.pool.acquire()?;

        let params: [&dyn ToSql; 3] = [&asset_id, &price, &ts];
        connection.execute(
            "INSERT INTO samples (asset_id, price, ts) VALUES (?, ?, ?)",
            params.as_slice(),
        )?;
        Ok(())
    }

    /// Look up the sample recorded at exactly `ts` for a symbol.
    ///
    /// Among duplicates at the same timestamp the earliest-inserted row wins.
    pub fn sample_at(&self, symbol: &str, ts: i64) -> Result<Option<SampleRow>, StoreError> {
        let connection = self.pool.acquire()?;

        let params: [&dyn ToSql; 2] = [&symbol, &ts];
        optional(connection.query_row(
            "SELECT s.price, s.ts FROM samples s \
             JOIN assets a ON a.id = s.asset_id \
             WHERE a.symbol = ? AND s.ts = ? \
             ORDER BY s.id LIMIT 1",
            params.as_slice(),
            |row| {
                Ok(SampleRow {
                    price: row.get(0)?,
                    ts: row.get(1)?,
                })
            },
        ))
    }

    /// Look up the sample whose timestamp is closest to `ts` across the
    /// symbol's entire history.
    ///
    /// Tie-break: smaller absolute distance, then the earlier timestamp,
    /// then the earlier-inserted row.
    pub fn sample_nearest(&self, symbol: &str, ts: i64) -> Result<Option<SampleRow>, StoreError> {
        let connection = self.pool.acquire()?;

        let params: [&dyn ToSql; 2] = [&symbol, &ts];
        optional(connection.query_row(
            "SELECT s.price, s.ts FROM samples s \
             JOIN assets a ON a.id = s.asset_id \
             WHERE a.symbol = ? \
             ORDER BY ABS(s.ts - ?), s.ts, s.id LIMIT 1",
            params.as_slice(),
            |row| {
                Ok(SampleRow {
                    price: row.get(0)?,
                    ts: row.get(1)?,
                })
            },
        ))
    }
}

/// Map the no-rows case to `None` instead of an error.
fn optional<T>(result: Result<T, ::duckdb::Error>) -> Result<Option<T>, StoreError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(::duckdb::Error::QueryReturnedNoRows) => Ok(None),
        Err(error) => Err(error.into()),
    }
}

/// Resolve the coinwatch home directory from environment or default.
fn resolve_coinwatch_home() -> PathBuf {
    if let Some(path) = env::var_os("COINWATCH_HOME") {
        let path = PathBuf::from(path);
        if !path.as_os_str().is_empty() {
            return path;
        }
    }

    if let Some(home) = env::var_os("HOME") {
        return PathBuf::from(home).join(".coinwatch");
    }

    PathBuf::from(".coinwatch")
}
