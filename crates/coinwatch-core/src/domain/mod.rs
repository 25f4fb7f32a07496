//! Canonical domain types for the price tracker.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated, lowercase asset identifier |
//! | [`Asset`] | A watched symbol with its active flag |
//! | [`Sample`] | One (price, timestamp) observation |
//! | [`PricePoint`] | A resolved query result with the matched timestamp |

mod models;
mod symbol;

pub use models::{Asset, PricePoint, Sample};
pub use symbol::Symbol;
