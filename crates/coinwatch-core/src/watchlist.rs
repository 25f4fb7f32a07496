//! Watch-list management.

use std::sync::Arc;

use crate::store::PriceStore;
use crate::{Asset, ServiceError, Symbol};

/// The registry of symbols under observation.
#[derive(Clone)]
pub struct Watchlist {
    store: Arc<dyn PriceStore>,
}

impl Watchlist {
    pub fn new(store: Arc<dyn PriceStore>) -> Self {
        Self { store }
    }

    /// Add a symbol to the watch-list.
    ///
    /// Adding a symbol that is already present (active or not) reactivates
    /// it; the operation is idempotent and never duplicates a symbol.
    pub fn add(&self, input: &str) -> Result<Symbol, ServiceError> {
        let symbol = Symbol::parse(input)?;
        self.store.activate(&symbol)?;
        Ok(symbol)
    }

    /// Remove a symbol and every sample recorded for it.
    ///
    /// Removal is destructive, not a soft deactivation; re-adding the symbol
    /// later starts an empty series.
    pub fn remove(&self, input: &str) -> Result<Symbol, ServiceError> {
        let symbol = Symbol::parse(input)?;
        if !self.store.remove(&symbol)? {
            return Err(ServiceError::UnknownSymbol { symbol });
        }
        Ok(symbol)
    }

    /// Symbols the sampler should fetch on its next cycle.
    pub fn active(&self) -> Result<Vec<Asset>, ServiceError> {
        Ok(self.store.active_assets()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn add_normalizes_and_reactivates() {
        let watchlist = Watchlist::new(Arc::new(MemoryStore::new()));

        let first = watchlist.add("Bitcoin").expect("first add");
        let second = watchlist.add("bitcoin").expect("second add");
        assert_eq!(first, second);

        let active = watchlist.active().expect("active");
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].symbol.as_str(), "bitcoin");
    }

    #[test]
    fn add_rejects_invalid_symbol() {
        let watchlist = Watchlist::new(Arc::new(MemoryStore::new()));

        let err = watchlist.add("btc/usd").expect_err("must fail");
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn remove_unknown_symbol_is_not_found() {
        let watchlist = Watchlist::new(Arc::new(MemoryStore::new()));

        let err = watchlist.remove("doge").expect_err("must fail");
        assert!(matches!(err, ServiceError::UnknownSymbol { .. }));
    }
}
