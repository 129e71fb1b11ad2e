//! Slim entry point: load config, wire the remote adapters, run one
//! distribution and log the ranked payouts. Exporting the list (files,
//! databases, transfer batches) is left to downstream tooling consuming
//! the aggregator's output.

use anyhow::{anyhow, Context, Result};
use std::sync::Arc;

use lp_rewards::aggregator::{AggregatorConfig, RewardAggregator};
use lp_rewards::allocator::RewardAllocator;
use lp_rewards::config::RewardsConfig;
use lp_rewards::eligibility::{EligibilityChecker, EligibilityCheckerConfig};
use lp_rewards::holders::{HolderFetcher, HolderFetcherConfig};
use lp_rewards::price::PriceOracle;
use lp_rewards::registry;
use lp_rewards::remote::{
    AnkrConfig, AnkrHolderSource, CoinGeckoConfig, CoinGeckoPriceSource, NftProbeConfig,
    SpecialNftProbe,
};
use lp_rewards::types::{Asset, Chain};

#[tokio::main]
async fn main() -> Result<()> {
    let config = match RewardsConfig::from_toml_file("config.toml") {
        Ok(c) => c,
        Err(_) => RewardsConfig::default(),
    };
    config.init_logging();

    let chain: Chain = config.chain.parse().map_err(|e: String| anyhow!(e))?;
    // no assets configured means every asset with an LP on the chain
    let assets: Vec<Asset> = if config.assets.is_empty() {
        registry::assets_for(chain).to_vec()
    } else {
        config
            .assets
            .iter()
            .map(|s| s.parse::<Asset>())
            .collect::<Result<_, String>>()
            .map_err(|e| anyhow!(e))?
    };
    anyhow::ensure!(!assets.is_empty(), "no assets available for {chain}");

    tracing::info!(
        chain = chain.display_name(),
        assets = ?assets,
        reward_amount = config.reward_amount,
        "starting LP reward distribution"
    );

    let holder_source = Arc::new(
        AnkrHolderSource::new(
            chain,
            AnkrConfig {
                base_url: config.holder_api.base_url.clone(),
                api_key: config.holder_api.api_key.clone(),
                page_size: config.holder_api.page_size,
                request_timeout_secs: config.holder_api.request_timeout_secs,
            },
        )
        .context("building holder indexer client")?,
    );
    let price_source = Arc::new(
        CoinGeckoPriceSource::new(CoinGeckoConfig {
            base_url: config.price_api.base_url.clone(),
            request_timeout_secs: config.price_api.request_timeout_secs,
        })
        .context("building price API client")?,
    );
    let nft_probe = Arc::new(
        SpecialNftProbe::new(NftProbeConfig {
            rpc_url: config
                .eligibility
                .rpc_url
                .clone()
                .unwrap_or_else(|| NftProbeConfig::default().rpc_url),
            ..NftProbeConfig::default()
        })
        .context("building eligibility probe")?,
    );

    let aggregator = RewardAggregator::new(
        HolderFetcher::new(
            holder_source,
            HolderFetcherConfig {
                rate_limit_per_minute: config.holder_api.rate_limit_per_minute,
            },
        ),
        PriceOracle::new(price_source),
        EligibilityChecker::new(
            nft_probe,
            EligibilityCheckerConfig {
                max_concurrent: config.eligibility.max_concurrent,
                lookup_timeout_secs: config.eligibility.lookup_timeout_secs,
            },
        ),
        RewardAllocator::default(),
        AggregatorConfig {
            ma_window_days: config.ma_window_days,
            min_balance: config.min_balance,
            usd_filter: config.usd_filter,
            boost_factor: config.boost_factor,
        },
    );

    let per_asset_budget = config.reward_amount / assets.len() as f64;
    let ranked = aggregator
        .process(chain, &assets, per_asset_budget)
        .await?;

    for entry in &ranked {
        tracing::info!(address = %entry.address, reward = entry.total_reward, "payout");
    }
    tracing::info!(recipients = ranked.len(), "run finished");

    Ok(())
}
