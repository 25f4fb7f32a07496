use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::http_client::{HttpClient, HttpRequest};
use crate::source::{PriceSource, SourceError};
use crate::Symbol;

/// Public CoinGecko API root.
pub const COINGECKO_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Upper bound on one quote fetch, including connect time.
const FETCH_TIMEOUT_MS: u64 = 10_000;

const USD: &str = "usd";

/// CoinGecko `simple/price` adapter.
///
/// Issues one GET per symbol and extracts the USD entry from the
/// symbol -> currency -> price response shape.
#[derive(Clone)]
pub struct CoinGeckoSource {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    api_key: Option<String>,
}

impl CoinGeckoSource {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            base_url: String::from(COINGECKO_BASE_URL),
            api_key: None,
        }
    }

    /// Point the adapter at a different API root (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Send a demo API key with every request.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    fn quote_url(&self, symbol: &Symbol) -> String {
        format!(
            "{}/simple/price?ids={}&vs_currencies={USD}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(symbol.as_str()),
        )
    }

    async fn fetch_usd_price(&self, symbol: &Symbol) -> Result<f64, SourceError> {
        let mut request = HttpRequest::get(self.quote_url(symbol)).with_timeout_ms(FETCH_TIMEOUT_MS);
        if let Some(api_key) = &self.api_key {
            request = request.with_header("x-cg-demo-api-key", api_key);
        }

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|error| SourceError::Transport {
                message: error.message().to_owned(),
            })?;

        if !response.is_success() {
            return Err(SourceError::BadStatus {
                status: response.status,
            });
        }

        let parsed: BTreeMap<String, BTreeMap<String, f64>> =
            serde_json::from_str(&response.body).map_err(|error| SourceError::MalformedBody {
                message: error.to_string(),
            })?;

        let price = parsed
            .get(symbol.as_str())
            .and_then(|quotes| quotes.get(USD))
            .copied()
            .ok_or_else(|| SourceError::MissingPrice {
                symbol: symbol.clone(),
            })?;

        if price <= 0.0 {
            return Err(SourceError::NonPositivePrice {
                symbol: symbol.clone(),
                price,
            });
        }

        Ok(price)
    }
}

impl PriceSource for CoinGeckoSource {
    fn usd_price<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<f64, SourceError>> + Send + 'a>> {
        Box::pin(self.fetch_usd_price(symbol))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::http_client::{HttpError, HttpResponse};

    struct CannedHttp {
        response: Result<HttpResponse, HttpError>,
        seen: Mutex<Option<HttpRequest>>,
    }

    impl CannedHttp {
        fn new(response: Result<HttpResponse, HttpError>) -> Arc<Self> {
            Arc::new(Self {
                response,
                seen: Mutex::new(None),
            })
        }
    }

    impl HttpClient for CannedHttp {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            *self.seen.lock().expect("request slot") = Some(request);
            let response = self.response.clone();
            Box::pin(async move { response })
        }
    }

    fn symbol(value: &str) -> Symbol {
        Symbol::parse(value).expect("test symbol")
    }

    #[tokio::test]
    async fn extracts_usd_price() {
        let http = CannedHttp::new(Ok(HttpResponse::ok_json(
            r#"{"bitcoin":{"usd":50000.0}}"#,
        )));
        let source = CoinGeckoSource::new(http.clone()).with_api_key("demo");

        let price = source
            .usd_price(&symbol("bitcoin"))
            .await
            .expect("price should resolve");
        assert_eq!(price, 50_000.0);

        let request = http.seen.lock().expect("request slot").clone().expect("request sent");
        assert_eq!(
            request.url,
            "https://api.coingecko.com/api/v3/simple/price?ids=bitcoin&vs_currencies=usd"
        );
        assert_eq!(request.timeout_ms, 10_000);
        assert_eq!(
            request.headers.get("x-cg-demo-api-key").map(String::as_str),
            Some("demo")
        );
    }

    #[tokio::test]
    async fn reports_transport_failure() {
        let http = CannedHttp::new(Err(HttpError::new("connection failed")));
        let source = CoinGeckoSource::new(http);

        let err = source
            .usd_price(&symbol("bitcoin"))
            .await
            .expect_err("must fail");
        assert!(matches!(err, SourceError::Transport { .. }));
    }

    #[tokio::test]
    async fn reports_bad_status() {
        let http = CannedHttp::new(Ok(HttpResponse {
            status: 429,
            body: String::new(),
        }));
        let source = CoinGeckoSource::new(http);

        let err = source
            .usd_price(&symbol("bitcoin"))
            .await
            .expect_err("must fail");
        assert!(matches!(err, SourceError::BadStatus { status: 429 }));
    }

    #[tokio::test]
    async fn reports_malformed_body() {
        let http = CannedHttp::new(Ok(HttpResponse::ok_json("not json")));
        let source = CoinGeckoSource::new(http);

        let err = source
            .usd_price(&symbol("bitcoin"))
            .await
            .expect_err("must fail");
        assert!(matches!(err, SourceError::MalformedBody { .. }));
    }

    #[tokio::test]
    async fn reports_missing_symbol() {
        let http = CannedHttp::new(Ok(HttpResponse::ok_json(
            r#"{"ethereum":{"usd":3000.0}}"#,
        )));
        let source = CoinGeckoSource::new(http);

        let err = source
            .usd_price(&symbol("bitcoin"))
            .await
            .expect_err("must fail");
        assert!(matches!(err, SourceError::MissingPrice { .. }));
    }

    #[tokio::test]
    async fn reports_missing_usd_entry() {
        let http = CannedHttp::new(Ok(HttpResponse::ok_json(
            r#"{"bitcoin":{"eur":46000.0}}"#,
        )));
        let source = CoinGeckoSource::new(http);

        let err = source
            .usd_price(&symbol("bitcoin"))
            .await
            .expect_err("must fail");
        assert!(matches!(err, SourceError::MissingPrice { .. }));
    }

    #[tokio::test]
    async fn rejects_non_positive_price() {
        let http = CannedHttp::new(Ok(HttpResponse::ok_json(r#"{"doge":{"usd":0.0}}"#)));
        let source = CoinGeckoSource::new(http);

        let err = source
            .usd_price(&symbol("doge"))
            .await
            .expect_err("must fail");
        assert!(matches!(
            err,
            SourceError::NonPositivePrice { price, .. } if price == 0.0
        ));
    }
}
