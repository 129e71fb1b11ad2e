//! Daily historical price adapter (CoinGecko market chart endpoint).

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{PricePoint, PriceSource};
use crate::utils::retry::call_remote_with_retry;

#[derive(Debug, Clone)]
pub struct CoinGeckoConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for CoinGeckoConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.coingecko.com/api/v3".to_string(),
            request_timeout_secs: 30,
        }
    }
}

pub struct CoinGeckoPriceSource {
    config: CoinGeckoConfig,
    http_client: Client,
}

/// Market chart body; samples arrive as `[timestamp_ms, price]` pairs.
#[derive(Debug, Deserialize)]
struct MarketChart {
    prices: Vec<(f64, f64)>,
}

impl CoinGeckoPriceSource {
    pub fn new(config: CoinGeckoConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            config,
            http_client,
        })
    }
}

#[async_trait]
impl PriceSource for CoinGeckoPriceSource {
    async fn daily_prices(&self, series_id: &str, days: u32) -> Result<Vec<PricePoint>> {
        let url = format!("{}/coins/{}/market_chart", self.config.base_url, series_id);
        let days_param = days.to_string();

        let chart: MarketChart = call_remote_with_retry(|| async {
            let response = self
                .http_client
                .get(&url)
                .query(&[
                    ("vs_currency", "usd"),
                    ("days", days_param.as_str()),
                    ("interval", "daily"),
                ])
                .send()
                .await
                .context("price API request failed")?;

            if !response.status().is_success() {
                bail!("price API returned HTTP {}", response.status());
            }

            response
                .json()
                .await
                .context("failed to parse market chart response")
        })
        .await?;

        let samples: Vec<PricePoint> = chart
            .prices
            .into_iter()
            .map(|(timestamp_ms, price)| PricePoint {
                timestamp_ms: timestamp_ms as u64,
                price,
            })
            .collect();

        debug!(series = series_id, days, samples = samples.len(), "fetched price history");
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_chart_deserialization() {
        let raw = r#"{
            "prices": [[1700000000000, 1850.23], [1700086400000, 1901.7]],
            "market_caps": [],
            "total_volumes": []
        }"#;
        let chart: MarketChart = serde_json::from_str(raw).unwrap();
        assert_eq!(chart.prices.len(), 2);
        assert_eq!(chart.prices[1].1, 1901.7);
    }
}
