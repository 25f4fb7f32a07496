//! Quote source contract.
//!
//! A [`PriceSource`] resolves one symbol to its current USD price. Failure
//! conditions are reported distinctly so the sampler can attribute each
//! skipped asset to a cause. Retry is deliberately not a source concern; a
//! failed fetch is simply skipped until the next ingestion cycle.

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::Symbol;

/// Per-fetch failure classification.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SourceError {
    /// Network or transport failure before a response was obtained.
    #[error("quote request failed: {message}")]
    Transport { message: String },

    /// The quote service answered with a non-success status.
    #[error("quote source returned status {status}")]
    BadStatus { status: u16 },

    /// The response body could not be parsed into the expected shape.
    #[error("malformed quote response: {message}")]
    MalformedBody { message: String },

    /// The symbol or its USD entry was absent from the parsed response.
    #[error("no USD price for '{symbol}' in quote response")]
    MissingPrice { symbol: Symbol },

    /// The call succeeded but the quote is unusable.
    #[error("non-positive price {price} for '{symbol}'")]
    NonPositivePrice { symbol: Symbol, price: f64 },
}

/// Source adapter contract.
///
/// Implementations must be `Send + Sync`; the sampler shares one source
/// across cycles.
pub trait PriceSource: Send + Sync {
    /// Fetch the current USD price for a symbol.
    fn usd_price<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<f64, SourceError>> + Send + 'a>>;
}
