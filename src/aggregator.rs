//! Per-asset pipeline orchestration and cross-asset reward accumulation.
//!
//! Assets are processed in input order: fetch holders, value them in USD,
//! apply the USD threshold, resolve eligibility, allocate the asset's
//! budget share. Each asset's records are merged into an accumulation map
//! owned exclusively by the aggregator; the finalized ranking is the run's
//! externally observable artifact.

use anyhow::{Context, Result};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{info, instrument};

use crate::allocator::RewardAllocator;
use crate::eligibility::EligibilityChecker;
use crate::holders::HolderFetcher;
use crate::price::PriceOracle;
use crate::registry;
use crate::types::{Asset, Chain, EligibleHolder, RankedReward, RewardRecord, ValuedHolder};

#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Moving-average window (days) for pricing volatile assets.
    pub ma_window_days: u32,
    /// Minimum raw LP balance kept at fetch time.
    pub min_balance: f64,
    /// Minimum USD valuation to qualify for rewards.
    pub usd_filter: f64,
    /// Multiplier for special-NFT holders.
    pub boost_factor: f64,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            ma_window_days: 7,
            min_balance: 0.0,
            usd_filter: 100.0,
            boost_factor: 1.1,
        }
    }
}

pub struct RewardAggregator {
    fetcher: HolderFetcher,
    oracle: PriceOracle,
    checker: EligibilityChecker,
    allocator: RewardAllocator,
    config: AggregatorConfig,
}

impl RewardAggregator {
    pub fn new(
        fetcher: HolderFetcher,
        oracle: PriceOracle,
        checker: EligibilityChecker,
        allocator: RewardAllocator,
        config: AggregatorConfig,
    ) -> Self {
        Self {
            fetcher,
            oracle,
            checker,
            allocator,
            config,
        }
    }

    /// Run the pipeline for every asset in order and return the merged
    /// ranked payout list, descending by total reward. Any fatal error
    /// aborts the whole run with asset and chain context attached.
    #[instrument(skip(self), fields(%chain, assets = assets.len()))]
    pub async fn process(
        &self,
        chain: Chain,
        assets: &[Asset],
        per_asset_budget: f64,
    ) -> Result<Vec<RankedReward>> {
        anyhow::ensure!(!assets.is_empty(), "no assets to process");

        info!(
            %chain,
            assets = assets.len(),
            per_asset_budget,
            "starting reward distribution run"
        );

        let mut totals: HashMap<String, f64> = HashMap::new();
        for asset in assets {
            let records = self
                .process_asset(chain, *asset, per_asset_budget)
                .await
                .with_context(|| format!("processing {asset} rewards on {chain}"))?;

            for record in records {
                *totals.entry(record.address).or_insert(0.0) += record.final_reward;
            }
        }

        let mut ranked: Vec<RankedReward> = totals
            .into_iter()
            .map(|(address, total_reward)| RankedReward {
                address,
                total_reward,
            })
            .collect();
        // descending by reward; equal totals order by address so the
        // exported list is deterministic across runs
        ranked.sort_by(|a, b| {
            b.total_reward
                .partial_cmp(&a.total_reward)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.address.cmp(&b.address))
        });

        let paid: f64 = ranked.iter().map(|r| r.total_reward).sum();
        info!(recipients = ranked.len(), paid, "reward distribution complete");

        Ok(ranked)
    }

    async fn process_asset(
        &self,
        chain: Chain,
        asset: Asset,
        budget: f64,
    ) -> Result<Vec<RewardRecord>> {
        let contract = registry::lp_contract(chain, asset)
            .with_context(|| format!("no LP contract registered for {asset} on {chain}"))?;

        let balances = self
            .fetcher
            .fetch(chain, contract, self.config.min_balance)
            .await
            .context("fetching holders")?;

        let unit_price = self
            .oracle
            .price(asset, self.config.ma_window_days)
            .await
            .context("resolving unit price")?;

        let mut valued: Vec<ValuedHolder> = balances
            .into_iter()
            .map(|(address, balance)| ValuedHolder {
                address,
                balance,
                usd_value: balance * unit_price,
            })
            .filter(|h| h.usd_value >= self.config.usd_filter)
            .collect();
        // largest holders first; address breaks ties so batches are stable
        valued.sort_by(|a, b| {
            b.usd_value
                .partial_cmp(&a.usd_value)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.address.cmp(&b.address))
        });

        info!(
            %asset,
            unit_price,
            qualifying = valued.len(),
            usd_filter = self.config.usd_filter,
            "holders valued and filtered"
        );

        let addresses: Vec<String> = valued.iter().map(|h| h.address.clone()).collect();
        let flags = self.checker.check(&addresses).await;

        let eligible: Vec<EligibleHolder> = valued
            .into_iter()
            .map(|h| {
                let is_special = flags.get(&h.address).copied().unwrap_or(false);
                EligibleHolder::new(h, is_special)
            })
            .collect();

        let records = self
            .allocator
            .allocate(&eligible, budget, self.config.boost_factor)
            .context("allocating rewards")?;

        Ok(records)
    }
}
