//! # Coinwatch Core
//!
//! Domain contracts and tracking services for the coinwatch price tracker.
//!
//! ## Overview
//!
//! Coinwatch keeps a watch-list of crypto symbols, samples each one's USD
//! price from CoinGecko on a fixed period, and answers point-in-time price
//! queries by exact or nearest-timestamp match.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Quote source adapters (CoinGecko) |
//! | [`domain`] | Domain models (Symbol, Asset, Sample, PricePoint) |
//! | [`error`] | Validation and service error types |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`lookup`] | Exact-then-nearest price resolution |
//! | [`sampler`] | Periodic ingestion loop |
//! | [`source`] | Quote source trait and error taxonomy |
//! | [`store`] | Store contract and in-memory test store |
//! | [`watchlist`] | Watch-list add/remove/list operations |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use coinwatch_core::{
//!     CoinGeckoSource, PriceDb, PriceLookup, ReqwestHttpClient, Sampler, Watchlist,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(PriceDb::open_default()?);
//! let watchlist = Watchlist::new(store.clone());
//! watchlist.add("bitcoin")?;
//!
//! let source = Arc::new(CoinGeckoSource::new(Arc::new(ReqwestHttpClient::new())));
//! let sampler = Sampler::new(store.clone(), source, Duration::from_secs(30));
//! let report = sampler.run_cycle().await;
//! println!("stored {} samples", report.stored);
//!
//! let lookup = PriceLookup::new(store);
//! let point = lookup.at("bitcoin", 1736500490)?;
//! println!("{} was ${} at {}", point.symbol, point.price, point.timestamp);
//! # Ok(())
//! # }
//! ```
//!
//! ## Failure model
//!
//! Validation and not-found outcomes surface directly to callers of the
//! watch-list and lookup services. Fetch and persistence failures inside an
//! ingestion cycle are logged and isolated to the affected asset; the loop
//! itself never fails.

pub mod adapters;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod lookup;
pub mod sampler;
pub mod source;
pub mod store;
pub mod watchlist;

// Re-export commonly used types at crate root for convenience

// Adapter implementations
pub use adapters::{CoinGeckoSource, COINGECKO_BASE_URL};

// Domain models
pub use domain::{Asset, PricePoint, Sample, Symbol};

// Error types
pub use error::{ServiceError, ValidationError};

// HTTP client types
pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient,
};

// Services
pub use lookup::PriceLookup;
pub use sampler::{CycleReport, FetchFailure, Sampler};
pub use watchlist::Watchlist;

// Source contract
pub use source::{PriceSource, SourceError};

// Store contract and implementations
pub use store::{MemoryStore, PriceStore};

// Durable store (re-exported from coinwatch-store)
pub use coinwatch_store::{PriceDb, StoreConfig, StoreError};
