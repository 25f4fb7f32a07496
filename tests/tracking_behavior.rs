//! Behavior tests for the ingestion loop against the durable store.
//!
//! A scripted HTTP transport stands in for the quote service so each cycle
//! is deterministic: per-asset failure isolation, rejection of unusable
//! quotes, and the add -> sample -> query round trip.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use coinwatch_core::{
    CoinGeckoSource, HttpClient, HttpError, HttpRequest, HttpResponse, MemoryStore, NoopHttpClient,
    PriceDb, PriceLookup, PriceStore, Sampler, ServiceError, StoreConfig, Watchlist,
};
use tempfile::tempdir;
use tokio::sync::watch;

/// Routes each symbol's quote URL to a canned transport outcome.
struct RoutedHttp {
    routes: Vec<(&'static str, Result<HttpResponse, HttpError>)>,
}

impl HttpClient for RoutedHttp {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let outcome = self
            .routes
            .iter()
            .find(|(symbol, _)| request.url.contains(&format!("ids={symbol}&")))
            .map(|(_, outcome)| outcome.clone())
            .unwrap_or_else(|| Err(HttpError::new(format!("no route for {}", request.url))));
        Box::pin(async move { outcome })
    }
}

fn open_store(temp: &tempfile::TempDir) -> Arc<dyn PriceStore> {
    let home = temp.path().join("coinwatch-home");
    let db_path = home.join("coinwatch.duckdb");
    Arc::new(
        PriceDb::open(StoreConfig {
            home,
            db_path,
            max_pool_size: 2,
        })
        .expect("store open"),
    )
}

fn source_with_routes(
    routes: Vec<(&'static str, Result<HttpResponse, HttpError>)>,
) -> Arc<CoinGeckoSource> {
    Arc::new(CoinGeckoSource::new(Arc::new(RoutedHttp { routes })))
}

#[tokio::test]
async fn one_failing_fetch_still_yields_samples_for_the_others() {
    let temp = tempdir().expect("tempdir");
    let store = open_store(&temp);
    let watchlist = Watchlist::new(store.clone());

    // Given: three active assets, one of which the quote service rejects
    watchlist.add("bitcoin").expect("add");
    watchlist.add("ethereum").expect("add");
    watchlist.add("solana").expect("add");

    let source = source_with_routes(vec![
        (
            "bitcoin",
            Ok(HttpResponse::ok_json(r#"{"bitcoin":{"usd":50000.0}}"#)),
        ),
        (
            "ethereum",
            Ok(HttpResponse {
                status: 500,
                body: String::new(),
            }),
        ),
        (
            "solana",
            Ok(HttpResponse::ok_json(r#"{"solana":{"usd":95.5}}"#)),
        ),
    ]);

    // When: one ingestion cycle runs
    let sampler = Sampler::new(store.clone(), source, Duration::from_secs(30));
    let report = sampler.run_cycle().await;

    // Then: the failure is isolated to its own asset
    assert_eq!(report.attempted, 3);
    assert_eq!(report.stored, 2);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].symbol.as_str(), "ethereum");

    let lookup = PriceLookup::new(store);
    assert_eq!(lookup.at("bitcoin", 0).expect("resolve").price, 50_000.0);
    assert_eq!(lookup.at("solana", 0).expect("resolve").price, 95.5);
    let err = lookup.at("ethereum", 0).expect_err("no sample");
    assert!(matches!(err, ServiceError::NoPriceData { .. }));
}

#[tokio::test]
async fn non_positive_quote_never_becomes_a_sample() {
    let temp = tempdir().expect("tempdir");
    let store = open_store(&temp);
    let watchlist = Watchlist::new(store.clone());
    watchlist.add("doge").expect("add");

    let source = source_with_routes(vec![(
        "doge",
        Ok(HttpResponse::ok_json(r#"{"doge":{"usd":0.0}}"#)),
    )]);

    let sampler = Sampler::new(store.clone(), source, Duration::from_secs(30));
    let report = sampler.run_cycle().await;

    assert_eq!(report.attempted, 1);
    assert_eq!(report.stored, 0);
    assert_eq!(report.failed.len(), 1);

    let lookup = PriceLookup::new(store);
    let err = lookup.at("doge", 0).expect_err("must stay empty");
    assert!(matches!(err, ServiceError::NoPriceData { .. }));
}

#[tokio::test]
async fn cycle_without_active_assets_is_a_noop() {
    let temp = tempdir().expect("tempdir");
    let store = open_store(&temp);

    let source = source_with_routes(Vec::new());
    let sampler = Sampler::new(store, source, Duration::from_secs(30));
    let report = sampler.run_cycle().await;

    assert_eq!(report.attempted, 0);
    assert_eq!(report.stored, 0);
    assert!(report.failed.is_empty());
}

#[tokio::test]
async fn tracked_symbol_round_trips_from_cycle_to_query() {
    let temp = tempdir().expect("tempdir");
    let store = open_store(&temp);
    let watchlist = Watchlist::new(store.clone());
    let lookup = PriceLookup::new(store.clone());

    // Given: bitcoin is tracked and the source quotes 50000
    watchlist.add("bitcoin").expect("add");
    let source = source_with_routes(vec![(
        "bitcoin",
        Ok(HttpResponse::ok_json(r#"{"bitcoin":{"usd":50000.0}}"#)),
    )]);

    // When: a cycle runs
    let sampler = Sampler::new(store, source, Duration::from_secs(30));
    let report = sampler.run_cycle().await;
    assert_eq!(report.stored, 1);

    // Then: querying near the cycle time resolves the stored sample, and an
    // exact query at the resolved timestamp agrees with it
    let nearest = lookup.at("bitcoin", 0).expect("resolve");
    assert_eq!(nearest.symbol.as_str(), "bitcoin");
    assert_eq!(nearest.price, 50_000.0);

    let exact = lookup.at("bitcoin", nearest.timestamp).expect("resolve");
    assert_eq!(exact.price, 50_000.0);
    assert_eq!(exact.timestamp, nearest.timestamp);
}

#[tokio::test(start_paused = true)]
async fn sampler_stops_on_shutdown_signal() {
    let store = Arc::new(MemoryStore::new());
    let source = Arc::new(CoinGeckoSource::new(Arc::new(NoopHttpClient)));
    let sampler = Sampler::new(store, source, Duration::from_secs(30));

    let (stop_tx, stop_rx) = watch::channel(false);
    let task = tokio::spawn(sampler.run(stop_rx));

    tokio::task::yield_now().await;
    stop_tx.send(true).expect("signal");
    task.await.expect("sampler task joins after the stop signal");
}
