use analysis_core::{ExchangeRate, RateSource};
use reqwest::Client;
use std::time::Duration;

const PRIMARY_URL: &str = "https://api.exchangerate.host/latest?base=USD&symbols=INR";
const SECONDARY_URL: &str = "https://open.er-api.com/v6/latest/USD";
const TARGET_CURRENCY: &str = "INR";

/// Rate used when both lookup services fail
pub const FALLBACK_USD_INR: f64 = 83.0;

/// USD to INR rate lookup with a primary service, a secondary service tried
/// only when the primary fails, and a constant fallback. Never fails the run.
pub struct ForexClient {
    client: Client,
}

impl ForexClient {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    pub async fn usd_to_inr(&self) -> ExchangeRate {
        let primary = self.fetch_rate(PRIMARY_URL).await;
        let secondary = match primary {
            Some(_) => None,
            None => self.fetch_rate(SECONDARY_URL).await,
        };

        let quote = select_rate(primary, secondary);
        if quote.source == RateSource::Fallback {
            tracing::warn!(
                "both currency lookups failed, using fallback rate {}",
                quote.rate
            );
        }
        quote
    }

    async fn fetch_rate(&self, url: &str) -> Option<f64> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("currency lookup request failed: {e}");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!("currency lookup returned HTTP {}", response.status());
            return None;
        }

        let body: serde_json::Value = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("currency lookup returned malformed JSON: {e}");
                return None;
            }
        };

        rate_from_json(&body, TARGET_CURRENCY)
    }
}

impl Default for ForexClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract `rates.<symbol>` from a lookup payload
pub fn rate_from_json(body: &serde_json::Value, symbol: &str) -> Option<f64> {
    body.get("rates")?.get(symbol)?.as_f64()
}

/// Primary wins, then secondary, then the fixed fallback constant
pub fn select_rate(primary: Option<f64>, secondary: Option<f64>) -> ExchangeRate {
    match (primary, secondary) {
        (Some(rate), _) => ExchangeRate {
            rate,
            source: RateSource::Primary,
        },
        (None, Some(rate)) => ExchangeRate {
            rate,
            source: RateSource::Secondary,
        },
        (None, None) => ExchangeRate {
            rate: FALLBACK_USD_INR,
            source: RateSource::Fallback,
        },
    }
}
