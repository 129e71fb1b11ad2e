//! Core domain types for the reward distribution pipeline.
//!
//! Holders move through the pipeline as explicit immutable records:
//! `HolderBalance` (raw balance) -> `ValuedHolder` (USD valuation) ->
//! `EligibleHolder` (NFT boost flag) -> `RewardRecord` (allocated reward).
//! Each stage produces a new record and consumes the previous one read-only.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported chains for LP token lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Chain {
    Optimism,
    ArbitrumOne,
    BnbChain,
    Gnosis,
    Polygon,
    Metis,
    Linea,
    Base,
}

impl Chain {
    /// Short identifier used in config files and log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Chain::Optimism => "optimism",
            Chain::ArbitrumOne => "arbitrum",
            Chain::BnbChain => "bnb_chain",
            Chain::Gnosis => "gnosis",
            Chain::Polygon => "polygon",
            Chain::Metis => "metis",
            Chain::Linea => "linea",
            Chain::Base => "base",
        }
    }

    /// Human-readable chain name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Chain::Optimism => "Optimism",
            Chain::ArbitrumOne => "Arbitrum One",
            Chain::BnbChain => "BNB Chain",
            Chain::Gnosis => "Gnosis Chain",
            Chain::Polygon => "Polygon Mainnet",
            Chain::Metis => "Metis",
            Chain::Linea => "Linea",
            Chain::Base => "Base",
        }
    }

    /// Blockchain identifier understood by the multichain holder indexer.
    /// Returns `None` for chains the indexer does not cover.
    pub fn indexer_name(&self) -> Option<&'static str> {
        match self {
            Chain::Optimism => Some("optimism"),
            Chain::ArbitrumOne => Some("arbitrum"),
            Chain::BnbChain => Some("bsc"),
            Chain::Gnosis => Some("gnosis"),
            Chain::Polygon => Some("polygon"),
            Chain::Linea => Some("linea"),
            Chain::Base => Some("base"),
            Chain::Metis => None,
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Chain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "optimism" => Ok(Chain::Optimism),
            "arbitrum" | "arbitrum_one" => Ok(Chain::ArbitrumOne),
            "bnb_chain" | "bsc" => Ok(Chain::BnbChain),
            "gnosis" => Ok(Chain::Gnosis),
            "polygon" => Ok(Chain::Polygon),
            "metis" => Ok(Chain::Metis),
            "linea" => Ok(Chain::Linea),
            "base" => Ok(Chain::Base),
            other => Err(format!("unknown chain: {other}")),
        }
    }
}

/// LP assets the reward program distributes over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Asset {
    Usdt,
    Usdc,
    Dai,
    Weth,
    Metis,
}

impl Asset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Asset::Usdt => "usdt",
            Asset::Usdc => "usdc",
            Asset::Dai => "dai",
            Asset::Weth => "weth",
            Asset::Metis => "metis",
        }
    }

    /// Stable assets are valued at a fixed 1.0 USD and never hit the price API.
    pub fn is_stable(&self) -> bool {
        matches!(self, Asset::Usdt | Asset::Usdc | Asset::Dai)
    }

    /// Identifier of the asset's daily price series on the historical price
    /// API. `None` for stable assets.
    pub fn price_series_id(&self) -> Option<&'static str> {
        match self {
            Asset::Weth => Some("ethereum"),
            Asset::Metis => Some("metis-token"),
            Asset::Usdt | Asset::Usdc | Asset::Dai => None,
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Asset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "usdt" => Ok(Asset::Usdt),
            "usdc" => Ok(Asset::Usdc),
            "dai" => Ok(Asset::Dai),
            "weth" => Ok(Asset::Weth),
            "metis" => Ok(Asset::Metis),
            other => Err(format!("unknown asset: {other}")),
        }
    }
}

/// A unique holder address and its raw LP token balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HolderBalance {
    pub address: String,
    pub balance: f64,
}

/// A holder balance valued in USD via the asset unit price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuedHolder {
    pub address: String,
    pub balance: f64,
    pub usd_value: f64,
}

/// A valued holder with its NFT eligibility flag resolved.
///
/// `is_special` defaults to `false` whenever the eligibility lookup failed;
/// the boost is never granted on uncertain data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibleHolder {
    pub address: String,
    pub balance: f64,
    pub usd_value: f64,
    pub is_special: bool,
}

impl EligibleHolder {
    pub fn new(valued: ValuedHolder, is_special: bool) -> Self {
        Self {
            address: valued.address,
            balance: valued.balance,
            usd_value: valued.usd_value,
            is_special,
        }
    }
}

/// Per-holder allocation for a single asset batch.
///
/// `base_reward` values for one batch sum to the batch budget within the
/// conservation tolerance; `final_reward` carries the boost for special
/// holders and may push the batch total above the nominal budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardRecord {
    pub address: String,
    /// Holder's share of the batch valuation, in [0, 1].
    pub weighted_score: f64,
    pub base_reward: f64,
    pub final_reward: f64,
}

/// One entry of the final ranked payout list, summed across all assets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedReward {
    pub address: String,
    pub total_reward: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_roundtrip() {
        for chain in [
            Chain::Optimism,
            Chain::ArbitrumOne,
            Chain::BnbChain,
            Chain::Gnosis,
            Chain::Polygon,
            Chain::Metis,
            Chain::Linea,
            Chain::Base,
        ] {
            assert_eq!(chain.as_str().parse::<Chain>().unwrap(), chain);
        }
        assert!("solana".parse::<Chain>().is_err());
    }

    #[test]
    fn test_stable_assets_have_no_price_series() {
        for asset in [Asset::Usdt, Asset::Usdc, Asset::Dai] {
            assert!(asset.is_stable());
            assert_eq!(asset.price_series_id(), None);
        }
        assert!(!Asset::Weth.is_stable());
        assert_eq!(Asset::Weth.price_series_id(), Some("ethereum"));
        assert_eq!(Asset::Metis.price_series_id(), Some("metis-token"));
    }

    #[test]
    fn test_indexer_coverage() {
        assert_eq!(Chain::BnbChain.indexer_name(), Some("bsc"));
        assert_eq!(Chain::Metis.indexer_name(), None);
    }
}
