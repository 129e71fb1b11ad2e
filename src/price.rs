//! USD unit price resolution.
//!
//! Stable assets are pegged at 1.0 and never touch the price API. Volatile
//! assets are valued at the simple moving average of their trailing daily
//! prices; a window with too few samples is a hard failure because every
//! downstream reward figure depends on the price.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::error::RewardError;
use crate::remote::PriceSource;
use crate::types::Asset;

pub struct PriceOracle {
    source: Arc<dyn PriceSource>,
}

impl PriceOracle {
    pub fn new(source: Arc<dyn PriceSource>) -> Self {
        Self { source }
    }

    /// Resolve the USD unit price for an asset.
    ///
    /// `window_days` is the moving-average window used for volatile assets;
    /// one extra day is requested as an inclusive buffer and only the most
    /// recent `window_days` samples enter the average.
    #[instrument(skip(self))]
    pub async fn price(&self, asset: Asset, window_days: u32) -> Result<f64> {
        if asset.is_stable() {
            return Ok(1.0);
        }

        let series = asset
            .price_series_id()
            .with_context(|| format!("no price series registered for {asset}"))?;

        let samples = self
            .source
            .daily_prices(series, window_days + 1)
            .await
            .with_context(|| format!("fetching {window_days}d price history for {asset}"))?;

        let need = window_days as usize;
        if samples.len() < need {
            return Err(RewardError::DataUnavailable {
                series: series.to_string(),
                got: samples.len(),
                need,
            }
            .into());
        }

        let window = &samples[samples.len() - need..];
        let average = window.iter().map(|p| p.price).sum::<f64>() / need as f64;

        info!(%asset, window_days, price = average, "resolved moving-average price");
        Ok(average)
    }
}
