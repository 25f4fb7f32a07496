//! Point-in-time price resolution.

use std::sync::Arc;

use crate::store::PriceStore;
use crate::{PricePoint, ServiceError, Symbol};

/// Resolves a (symbol, timestamp) pair to the best-matching stored sample.
#[derive(Clone)]
pub struct PriceLookup {
    store: Arc<dyn PriceStore>,
}

impl PriceLookup {
    pub fn new(store: Arc<dyn PriceStore>) -> Self {
        Self { store }
    }

    /// Resolve a price at `ts` (unix seconds).
    ///
    /// An exact-timestamp sample wins when one exists; otherwise the sample
    /// closest to `ts` over the symbol's entire history answers. The result
    /// carries the timestamp that actually matched. A symbol with no
    /// samples, or an unknown symbol, is a not-found outcome, never a zero
    /// price.
    pub fn at(&self, input: &str, ts: i64) -> Result<PricePoint, ServiceError> {
        let symbol = Symbol::parse(input)?;

        let sample = match self.store.sample_at(&symbol, ts)? {
            Some(sample) => sample,
            None => self
                .store
                .sample_nearest(&symbol, ts)?
                .ok_or_else(|| ServiceError::NoPriceData {
                    symbol: symbol.clone(),
                })?,
        };

        Ok(PricePoint {
            symbol,
            price: sample.price,
            timestamp: sample.ts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::Watchlist;

    fn seeded() -> PriceLookup {
        let store = Arc::new(MemoryStore::new());
        let watchlist = Watchlist::new(store.clone());
        watchlist.add("bitcoin").expect("add");
        let asset = watchlist.active().expect("active").remove(0);
        store.append(asset.id, 100.0, 100).expect("append");
        store.append(asset.id, 200.0, 200).expect("append");
        store.append(asset.id, 400.0, 400).expect("append");
        PriceLookup::new(store)
    }

    #[test]
    fn exact_match_wins_over_nearest() {
        let lookup = seeded();

        let point = lookup.at("bitcoin", 200).expect("resolve");
        assert_eq!(point.timestamp, 200);
        assert_eq!(point.price, 200.0);
    }

    #[test]
    fn falls_back_to_nearest_sample() {
        let lookup = seeded();

        let point = lookup.at("bitcoin", 250).expect("resolve");
        assert_eq!(point.timestamp, 200);

        let point = lookup.at("bitcoin", 350).expect("resolve");
        assert_eq!(point.timestamp, 400);
    }

    #[test]
    fn unknown_symbol_is_not_found() {
        let lookup = seeded();

        let err = lookup.at("doge", 200).expect_err("must fail");
        assert!(matches!(err, ServiceError::NoPriceData { .. }));
    }
}
