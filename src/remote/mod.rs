//! Remote collaborator interfaces and their production adapters.
//!
//! The core pipeline talks to three external services through trait seams:
//! a paginated token-holder indexer, a per-address NFT eligibility probe,
//! and a daily historical price source. Transport concerns (HTTP, retries,
//! rate limits) live entirely in the adapters behind these traits.

pub mod ankr;
pub mod coingecko;
pub mod nft;

pub use ankr::{AnkrConfig, AnkrHolderSource};
pub use coingecko::{CoinGeckoConfig, CoinGeckoPriceSource};
pub use nft::{NftProbeConfig, SpecialNftProbe};

use crate::types::HolderBalance;
use anyhow::Result;
use async_trait::async_trait;

/// One page of a token's holder list.
#[derive(Debug, Clone)]
pub struct HolderPage {
    pub holders: Vec<HolderBalance>,
    /// Authoritative total number of holders, reported by the source on
    /// every page.
    pub holder_count: usize,
    /// Continuation token for the next page; `None` on the last page.
    pub next_page_token: Option<String>,
}

/// A single daily price sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub timestamp_ms: u64,
    pub price: f64,
}

/// Paginated "holders of token X" data source.
#[async_trait]
pub trait HolderSource: Send + Sync {
    /// Fetch one page of holders for a token contract. Pass the previous
    /// page's continuation token to advance; `None` fetches the first page.
    async fn list_holders(
        &self,
        contract_address: &str,
        page_token: Option<&str>,
    ) -> Result<HolderPage>;
}

/// "Is this address special" oracle.
#[async_trait]
pub trait EligibilityProbe: Send + Sync {
    async fn is_eligible(&self, address: &str) -> Result<bool>;
}

/// Daily historical price source for volatile assets.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Return up to `days` daily samples for a price series, oldest first.
    async fn daily_prices(&self, series_id: &str, days: u32) -> Result<Vec<PricePoint>>;
}
