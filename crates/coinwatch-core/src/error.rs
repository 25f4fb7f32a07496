use thiserror::Error;

use crate::Symbol;
use coinwatch_store::StoreError;

/// Symbol validation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },
}

/// Errors surfaced by the watch-list and price lookup services.
///
/// Validation and not-found outcomes are normal results of user input and
/// are returned to the caller directly; store failures wrap the underlying
/// cause.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("symbol '{symbol}' is not tracked")]
    UnknownSymbol { symbol: Symbol },

    #[error("no price recorded for '{symbol}'")]
    NoPriceData { symbol: Symbol },

    #[error(transparent)]
    Store(#[from] StoreError),
}
