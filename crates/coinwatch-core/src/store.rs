//! Store contract shared by the watch-list, the sampler, and price lookup.
//!
//! Services receive an `Arc<dyn PriceStore>` at construction; nothing in the
//! crate reaches for a global store handle. [`coinwatch_store::PriceDb`] is
//! the durable implementation, [`MemoryStore`] the in-process one for
//! deterministic tests.

use std::sync::Mutex;

use coinwatch_store::{PriceDb, StoreError};

use crate::{Asset, Sample, Symbol};

/// Watch-list and price series operations.
pub trait PriceStore: Send + Sync {
    /// Mark a symbol as watched, reactivating it if it already exists.
    fn activate(&self, symbol: &Symbol) -> Result<(), StoreError>;

    /// Delete a symbol and every sample it owns. Returns `false` when the
    /// symbol is unknown.
    fn remove(&self, symbol: &Symbol) -> Result<bool, StoreError>;

    /// Every asset currently flagged active, in unspecified order.
    fn active_assets(&self) -> Result<Vec<Asset>, StoreError>;

    /// Append one immutable sample. No dedup.
    fn append(&self, asset_id: i64, price: f64, ts: i64) -> Result<(), StoreError>;

    /// The sample recorded at exactly `ts`, if any.
    fn sample_at(&self, symbol: &Symbol, ts: i64) -> Result<Option<Sample>, StoreError>;

    /// The sample minimizing `|sample.ts - ts|` over the symbol's history.
    ///
    /// Ties resolve to the earlier timestamp, then the earlier-inserted row.
    fn sample_nearest(&self, symbol: &Symbol, ts: i64) -> Result<Option<Sample>, StoreError>;
}

impl PriceStore for PriceDb {
    fn activate(&self, symbol: &Symbol) -> Result<(), StoreError> {
        self.activate_asset(symbol.as_str())
    }

    fn remove(&self, symbol: &Symbol) -> Result<bool, StoreError> {
        self.remove_asset(symbol.as_str())
    }

    fn active_assets(&self) -> Result<Vec<Asset>, StoreError> {
        self.active_assets()?
            .into_iter()
            .map(|row| {
                let symbol = Symbol::parse(&row.symbol)
                    .map_err(|error| StoreError::InvalidRow(error.to_string()))?;
                Ok(Asset {
                    id: row.id,
                    symbol,
                    active: row.active,
                })
            })
            .collect()
    }

    fn append(&self, asset_id: i64, price: f64, ts: i64) -> Result<(), StoreError> {
        self.append_sample(asset_id, price, ts)
    }

    fn sample_at(&self, symbol: &Symbol, ts: i64) -> Result<Option<Sample>, StoreError> {
        Ok(self
            .sample_at(symbol.as_str(), ts)?
            .map(|row| Sample {
                price: row.price,
                ts: row.ts,
            }))
    }

    fn sample_nearest(&self, symbol: &Symbol, ts: i64) -> Result<Option<Sample>, StoreError> {
        Ok(self
            .sample_nearest(symbol.as_str(), ts)?
            .map(|row| Sample {
                price: row.price,
                ts: row.ts,
            }))
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    next_asset_id: i64,
    next_seq: i64,
    assets: Vec<MemoryAsset>,
    samples: Vec<MemorySample>,
}

#[derive(Debug)]
struct MemoryAsset {
    id: i64,
    symbol: Symbol,
    active: bool,
}

#[derive(Debug)]
struct MemorySample {
    seq: i64,
    asset_id: i64,
    price: f64,
    ts: i64,
}

/// In-memory store for deterministic offline tests.
///
/// Mirrors the durable store's semantics exactly, including the
/// nearest-match tie-break.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PriceStore for MemoryStore {
    fn activate(&self, symbol: &Symbol) -> Result<(), StoreError> {
        let mut state = self.state.lock().expect("memory store mutex poisoned");

        if let Some(asset) = state.assets.iter_mut().find(|a| a.symbol == *symbol) {
            asset.active = true;
            return Ok(());
        }

        state.next_asset_id += 1;
        let id = state.next_asset_id;
        state.assets.push(MemoryAsset {
            id,
            symbol: symbol.clone(),
            active: true,
        });
        Ok(())
    }

    fn remove(&self, symbol: &Symbol) -> Result<bool, StoreError> {
        let mut state = self.state.lock().expect("memory store mutex poisoned");

        let Some(index) = state.assets.iter().position(|a| a.symbol == *symbol) else {
            return Ok(false);
        };
        let asset_id = state.assets[index].id;
        state.samples.retain(|sample| sample.asset_id != asset_id);
        state.assets.remove(index);
        Ok(true)
    }

    fn active_assets(&self) -> Result<Vec<Asset>, StoreError> {
        let state = self.state.lock().expect("memory store mutex poisoned");
        Ok(state
            .assets
            .iter()
            .filter(|a| a.active)
            .map(|a| Asset {
                id: a.id,
                symbol: a.symbol.clone(),
                active: a.active,
            })
            .collect())
    }

    fn append(&self, asset_id: i64, price: f64, ts: i64) -> Result<(), StoreError> {
        let mut state = self.state.lock().expect("memory store mutex poisoned");
        state.next_seq += 1;
        let seq = state.next_seq;
        state.samples.push(MemorySample {
            seq,
            asset_id,
            price,
            ts,
        });
        Ok(())
    }

    fn sample_at(&self, symbol: &Symbol, ts: i64) -> Result<Option<Sample>, StoreError> {
        let state = self.state.lock().expect("memory store mutex poisoned");
        let Some(asset_id) = asset_id_of(&state, symbol) else {
            return Ok(None);
        };

        Ok(state
            .samples
            .iter()
            .filter(|sample| sample.asset_id == asset_id && sample.ts == ts)
            .min_by_key(|sample| sample.seq)
            .map(|sample| Sample {
                price: sample.price,
                ts: sample.ts,
            }))
    }

    fn sample_nearest(&self, symbol: &Symbol, ts: i64) -> Result<Option<Sample>, StoreError> {
        let state = self.state.lock().expect("memory store mutex poisoned");
        let Some(asset_id) = asset_id_of(&state, symbol) else {
            return Ok(None);
        };

        Ok(state
            .samples
            .iter()
            .filter(|sample| sample.asset_id == asset_id)
            .min_by_key(|sample| (sample.ts.abs_diff(ts), sample.ts, sample.seq))
            .map(|sample| Sample {
                price: sample.price,
                ts: sample.ts,
            }))
    }
}

fn asset_id_of(state: &MemoryState, symbol: &Symbol) -> Option<i64> {
    state
        .assets
        .iter()
        .find(|asset| asset.symbol == *symbol)
        .map(|asset| asset.id)
}
