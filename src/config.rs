//! Run configuration for the reward distribution engine.
//!
//! Loaded from a TOML file with environment-variable overrides for secrets,
//! falling back to production defaults when no file is present.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::Level;

/// Top-level configuration for a distribution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardsConfig {
    /// Chain whose LP holders are rewarded.
    pub chain: String,
    /// Assets to process, in distribution order.
    pub assets: Vec<String>,
    /// Total reward budget, split evenly across assets.
    pub reward_amount: f64,
    /// Multiplier applied to the base reward of special-NFT holders.
    pub boost_factor: f64,
    /// Moving-average window (days) for pricing volatile assets.
    pub ma_window_days: u32,
    /// Minimum USD holding to qualify for rewards.
    pub usd_filter: f64,
    /// Minimum raw LP balance kept after the fetch.
    pub min_balance: f64,
    pub log_level: String,
    pub holder_api: HolderApiConfig,
    pub price_api: PriceApiConfig,
    pub eligibility: EligibilityApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolderApiConfig {
    pub base_url: String,
    /// Indexer API key. Usually injected via the ANKR_KEY environment
    /// variable rather than the config file.
    pub api_key: Option<String>,
    pub page_size: u32,
    pub request_timeout_secs: u64,
    /// Page requests per minute while paginating.
    pub rate_limit_per_minute: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceApiConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityApiConfig {
    /// RPC endpoint for the NFT contract call. Defaults to the public
    /// endpoint of the NFT's home chain when unset.
    pub rpc_url: Option<String>,
    /// Concurrent in-flight eligibility lookups.
    pub max_concurrent: usize,
    pub lookup_timeout_secs: u64,
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            chain: "optimism".to_string(),
            assets: vec!["weth".to_string(), "usdc".to_string(), "usdt".to_string()],
            reward_amount: 2500.0,
            boost_factor: 1.1,
            ma_window_days: 7,
            usd_filter: 100.0,
            min_balance: 0.0,
            log_level: "info".to_string(),
            holder_api: HolderApiConfig {
                base_url: "https://rpc.ankr.com/multichain".to_string(),
                api_key: None,
                page_size: 10_000,
                request_timeout_secs: 30,
                rate_limit_per_minute: 30,
            },
            price_api: PriceApiConfig {
                base_url: "https://api.coingecko.com/api/v3".to_string(),
                request_timeout_secs: 30,
            },
            eligibility: EligibilityApiConfig {
                rpc_url: None,
                max_concurrent: 10,
                lookup_timeout_secs: 10,
            },
        }
    }
}

impl RewardsConfig {
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: RewardsConfig = toml::from_str(&contents)?;

        // Secrets come from the environment, never the config file
        if let Ok(key) = std::env::var("ANKR_KEY") {
            if !key.is_empty() {
                config.holder_api.api_key = Some(key);
            }
        }
        if let Ok(url) = std::env::var("ELIGIBILITY_RPC_URL") {
            if !url.is_empty() {
                config.eligibility.rpc_url = Some(url);
            }
        }

        Ok(config)
    }

    pub fn init_logging(&self) {
        let level = match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };
        tracing_subscriber::fmt().with_max_level(level).init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reward_policy() {
        let config = RewardsConfig::default();
        assert_eq!(config.reward_amount, 2500.0);
        assert_eq!(config.boost_factor, 1.1);
        assert_eq!(config.ma_window_days, 7);
        assert_eq!(config.usd_filter, 100.0);
        assert_eq!(config.eligibility.max_concurrent, 10);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = RewardsConfig::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: RewardsConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.chain, config.chain);
        assert_eq!(parsed.assets, config.assets);
        assert_eq!(parsed.holder_api.page_size, config.holder_api.page_size);
    }
}
