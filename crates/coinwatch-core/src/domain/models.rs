use serde::{Deserialize, Serialize};

use crate::Symbol;

/// A tracked asset and its sampling state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub id: i64,
    pub symbol: Symbol,
    pub active: bool,
}

/// One immutable price observation for an asset.
///
/// `ts` is the ingestion wall-clock time in unix seconds, not a
/// source-reported time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub price: f64,
    pub ts: i64,
}

/// A resolved price query result.
///
/// `timestamp` is the timestamp of the sample that actually answered the
/// query, which may differ from the requested one under nearest-match
/// resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub symbol: Symbol,
    pub price: f64,
    pub timestamp: i64,
}
