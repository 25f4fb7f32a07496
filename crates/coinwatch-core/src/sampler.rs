//! Periodic price ingestion.
//!
//! One long-lived task drives the whole ingestion side of the system: every
//! `period` it lists the active assets, fetches each one's USD price, and
//! appends a sample stamped with the ingestion wall-clock time. A failure on
//! any single asset (fetch or persist) is logged and skipped; it never
//! aborts the cycle or the loop. Transient upstream trouble therefore heals
//! on the next cycle without operator action.

use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::source::PriceSource;
use crate::store::PriceStore;
use crate::Symbol;

/// One asset's failed attempt within a cycle.
#[derive(Debug, Clone)]
pub struct FetchFailure {
    pub symbol: Symbol,
    pub reason: String,
}

/// Outcome of a single ingestion cycle.
#[derive(Debug, Clone, Default)]
pub struct CycleReport {
    /// Active assets attempted this cycle (each exactly once).
    pub attempted: usize,
    /// Samples persisted.
    pub stored: usize,
    /// Per-asset failures, fetch and persist alike.
    pub failed: Vec<FetchFailure>,
}

/// The recurring ingestion loop.
pub struct Sampler {
    store: Arc<dyn PriceStore>,
    source: Arc<dyn PriceSource>,
    period: Duration,
}

impl Sampler {
    pub fn new(store: Arc<dyn PriceStore>, source: Arc<dyn PriceSource>, period: Duration) -> Self {
        Self {
            store,
            source,
            period,
        }
    }

    /// Run cycles until the shutdown channel flips to `true` or its sender
    /// is dropped.
    ///
    /// The first cycle fires immediately; cycles run inline in this task, so
    /// they never overlap. A cycle that overruns the period delays the next
    /// tick instead of bursting.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(period_secs = self.period.as_secs(), "sampler started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let report = self.run_cycle().await;
                    if report.attempted > 0 {
                        info!(
                            attempted = report.attempted,
                            stored = report.stored,
                            failed = report.failed.len(),
                            "ingestion cycle completed"
                        );
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("sampler stopping");
                        return;
                    }
                }
            }
        }
    }

    /// Execute one ingestion cycle.
    pub async fn run_cycle(&self) -> CycleReport {
        let mut report = CycleReport::default();

        let assets = match self.store.active_assets() {
            Ok(assets) => assets,
            Err(error) => {
                warn!(error = %error, "failed to list active assets, skipping cycle");
                return report;
            }
        };

        if assets.is_empty() {
            debug!("no active assets, nothing to sample");
            return report;
        }

        for asset in assets {
            report.attempted += 1;

            let price = match self.source.usd_price(&asset.symbol).await {
                Ok(price) => price,
                Err(error) => {
                    warn!(symbol = %asset.symbol, error = %error, "quote fetch failed");
                    report.failed.push(FetchFailure {
                        symbol: asset.symbol.clone(),
                        reason: error.to_string(),
                    });
                    continue;
                }
            };

            let ts = OffsetDateTime::now_utc().unix_timestamp();
            match self.store.append(asset.id, price, ts) {
                Ok(()) => {
                    report.stored += 1;
                    info!(symbol = %asset.symbol, price, ts, "sample stored");
                }
                Err(error) => {
                    warn!(symbol = %asset.symbol, error = %error, "failed to persist sample");
                    report.failed.push(FetchFailure {
                        symbol: asset.symbol.clone(),
                        reason: error.to_string(),
                    });
                }
            }
        }

        report
    }
}
