//! End-to-end tests for the reward distribution pipeline.
//!
//! The remote collaborators are replaced with in-memory fakes behind the
//! `remote` trait seams; everything from holder fetch to the final ranked
//! payout list runs the production code path.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use lp_rewards::aggregator::{AggregatorConfig, RewardAggregator};
use lp_rewards::allocator::RewardAllocator;
use lp_rewards::eligibility::{EligibilityChecker, EligibilityCheckerConfig};
use lp_rewards::error::RewardError;
use lp_rewards::holders::{HolderFetcher, HolderFetcherConfig};
use lp_rewards::price::PriceOracle;
use lp_rewards::registry;
use lp_rewards::remote::{EligibilityProbe, HolderPage, HolderSource, PricePoint, PriceSource};
use lp_rewards::types::{Asset, Chain, HolderBalance};

/// Holder lists keyed by LP contract address, served one page at a time.
struct InMemoryHolders {
    by_contract: HashMap<String, Vec<(String, f64)>>,
    page_size: usize,
    /// When set, every contract reports this holder count instead of the
    /// real one.
    forced_count: Option<usize>,
}

impl InMemoryHolders {
    fn new(entries: &[(Chain, Asset, &[(&str, f64)])]) -> Self {
        let mut by_contract = HashMap::new();
        for (chain, asset, holders) in entries {
            let contract = registry::lp_contract(*chain, *asset).unwrap().to_string();
            by_contract.insert(
                contract,
                holders
                    .iter()
                    .map(|(a, b)| (a.to_string(), *b))
                    .collect::<Vec<_>>(),
            );
        }
        Self {
            by_contract,
            page_size: 2,
            forced_count: None,
        }
    }
}

#[async_trait]
impl HolderSource for InMemoryHolders {
    async fn list_holders(
        &self,
        contract_address: &str,
        page_token: Option<&str>,
    ) -> Result<HolderPage> {
        let all = self
            .by_contract
            .get(contract_address)
            .ok_or_else(|| anyhow::anyhow!("unknown contract {contract_address}"))?;

        let start: usize = page_token.map(|t| t.parse().unwrap()).unwrap_or(0);
        let end = (start + self.page_size).min(all.len());
        let holders = all[start..end]
            .iter()
            .map(|(address, balance)| HolderBalance {
                address: address.clone(),
                balance: *balance,
            })
            .collect();

        Ok(HolderPage {
            holders,
            holder_count: self.forced_count.unwrap_or(all.len()),
            next_page_token: (end < all.len()).then(|| end.to_string()),
        })
    }
}

/// Fixed daily price history; counts how often it gets called.
struct InMemoryPrices {
    samples: Vec<f64>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl PriceSource for InMemoryPrices {
    async fn daily_prices(&self, _series_id: &str, days: u32) -> Result<Vec<PricePoint>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .samples
            .iter()
            .take(days as usize)
            .enumerate()
            .map(|(i, &price)| PricePoint {
                timestamp_ms: 1_700_000_000_000 + i as u64 * 86_400_000,
                price,
            })
            .collect())
    }
}

/// Special status by address allowlist; unknown addresses error out.
struct InMemoryEligibility {
    special: Vec<String>,
    failing: Vec<String>,
}

#[async_trait]
impl EligibilityProbe for InMemoryEligibility {
    async fn is_eligible(&self, address: &str) -> Result<bool> {
        if self.failing.iter().any(|a| a == address) {
            anyhow::bail!("RPC unavailable");
        }
        Ok(self.special.iter().any(|a| a == address))
    }
}

struct PipelineBuilder {
    holders: InMemoryHolders,
    prices: Vec<f64>,
    special: Vec<String>,
    failing: Vec<String>,
    config: AggregatorConfig,
}

impl PipelineBuilder {
    fn new(holders: InMemoryHolders) -> Self {
        Self {
            holders,
            prices: vec![1.0; 8],
            special: vec![],
            failing: vec![],
            config: AggregatorConfig {
                ma_window_days: 7,
                min_balance: 0.0,
                usd_filter: 100.0,
                boost_factor: 1.1,
            },
        }
    }

    fn special(mut self, addresses: &[&str]) -> Self {
        self.special = addresses.iter().map(|s| s.to_string()).collect();
        self
    }

    fn failing(mut self, addresses: &[&str]) -> Self {
        self.failing = addresses.iter().map(|s| s.to_string()).collect();
        self
    }

    fn prices(mut self, prices: Vec<f64>) -> Self {
        self.prices = prices;
        self
    }

    fn build(self) -> (RewardAggregator, Arc<AtomicUsize>) {
        let price_calls = Arc::new(AtomicUsize::new(0));
        let aggregator = RewardAggregator::new(
            HolderFetcher::new(Arc::new(self.holders), HolderFetcherConfig::default()),
            PriceOracle::new(Arc::new(InMemoryPrices {
                samples: self.prices,
                calls: price_calls.clone(),
            })),
            EligibilityChecker::new(
                Arc::new(InMemoryEligibility {
                    special: self.special,
                    failing: self.failing,
                }),
                EligibilityCheckerConfig::default(),
            ),
            RewardAllocator::default(),
            self.config,
        );
        (aggregator, price_calls)
    }
}

#[tokio::test]
async fn test_single_asset_boosted_distribution() {
    // {A: 1000, B: 500}, unit price 1.0, budget 300, boost 1.1, A special
    let holders = InMemoryHolders::new(&[(
        Chain::Optimism,
        Asset::Usdc,
        &[("0xaaa", 1000.0), ("0xbbb", 500.0)][..],
    )]);
    let (aggregator, price_calls) = PipelineBuilder::new(holders).special(&["0xaaa"]).build();

    let ranked = aggregator
        .process(Chain::Optimism, &[Asset::Usdc], 300.0)
        .await
        .unwrap();

    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].address, "0xaaa");
    assert!((ranked[0].total_reward - 220.0).abs() < 1e-9);
    assert_eq!(ranked[1].address, "0xbbb");
    assert!((ranked[1].total_reward - 100.0).abs() < 1e-9);

    // stable asset: the price API must never be hit
    assert_eq!(price_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_holder_in_multiple_assets_gets_summed_rewards() {
    // two assets, budget 150 each; C holds a 1/3 share of the first batch
    // (base 50) and a 1/5 share of the second (base 30), nobody special
    let holders = InMemoryHolders::new(&[
        (
            Chain::Optimism,
            Asset::Usdc,
            &[("0xccc", 100.0), ("0xddd", 200.0)][..],
        ),
        (
            Chain::Optimism,
            Asset::Usdt,
            &[("0xccc", 100.0), ("0xeee", 400.0)][..],
        ),
    ]);
    let (aggregator, _) = PipelineBuilder::new(holders).build();

    let ranked = aggregator
        .process(Chain::Optimism, &[Asset::Usdc, Asset::Usdt], 150.0)
        .await
        .unwrap();

    let totals: HashMap<&str, f64> = ranked
        .iter()
        .map(|r| (r.address.as_str(), r.total_reward))
        .collect();
    assert!((totals["0xccc"] - 80.0).abs() < 1e-9);
    assert!((totals["0xddd"] - 100.0).abs() < 1e-9);
    assert!((totals["0xeee"] - 120.0).abs() < 1e-9);

    let order: Vec<&str> = ranked.iter().map(|r| r.address.as_str()).collect();
    assert_eq!(order, vec!["0xeee", "0xddd", "0xccc"]);
}

#[tokio::test]
async fn test_volatile_asset_uses_moving_average_price() {
    // 8 samples served, 7-day window: mean of the last 7
    let holders = InMemoryHolders::new(&[(
        Chain::Optimism,
        Asset::Weth,
        &[("0xaaa", 2.0), ("0xbbb", 1.0)][..],
    )]);
    let (aggregator, price_calls) = PipelineBuilder::new(holders)
        .prices(vec![9999.0, 2000.0, 2000.0, 2000.0, 2000.0, 2000.0, 2000.0, 2000.0])
        .build();

    let ranked = aggregator
        .process(Chain::Optimism, &[Asset::Weth], 300.0)
        .await
        .unwrap();

    assert_eq!(price_calls.load(Ordering::SeqCst), 1);
    // valuations 4000 and 2000 USD: shares 2/3 and 1/3 of the budget
    assert!((ranked[0].total_reward - 200.0).abs() < 1e-9);
    assert!((ranked[1].total_reward - 100.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_failed_eligibility_lookup_never_grants_boost() {
    let holders = InMemoryHolders::new(&[(
        Chain::Optimism,
        Asset::Usdc,
        &[("0xaaa", 1000.0), ("0xbbb", 500.0)][..],
    )]);
    // A is on the special list but its lookup fails: no boost
    let (aggregator, _) = PipelineBuilder::new(holders)
        .special(&["0xaaa"])
        .failing(&["0xaaa"])
        .build();

    let ranked = aggregator
        .process(Chain::Optimism, &[Asset::Usdc], 300.0)
        .await
        .unwrap();

    assert!((ranked[0].total_reward - 200.0).abs() < 1e-9);
    assert!((ranked[1].total_reward - 100.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_usd_threshold_keeps_boundary_and_drops_below() {
    let holders = InMemoryHolders::new(&[(
        Chain::Optimism,
        Asset::Usdc,
        &[("0xaaa", 100.0), ("0xbbb", 99.99), ("0xccc", 300.0)][..],
    )]);
    let (aggregator, _) = PipelineBuilder::new(holders).build();

    let ranked = aggregator
        .process(Chain::Optimism, &[Asset::Usdc], 400.0)
        .await
        .unwrap();

    let addresses: Vec<&str> = ranked.iter().map(|r| r.address.as_str()).collect();
    assert_eq!(addresses, vec!["0xccc", "0xaaa"]);
    // 100 + 300 USD split a 400 budget
    assert!((ranked[0].total_reward - 300.0).abs() < 1e-9);
    assert!((ranked[1].total_reward - 100.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_count_mismatch_aborts_the_run_with_context() {
    let mut holders = InMemoryHolders::new(&[(
        Chain::Optimism,
        Asset::Usdc,
        &[("0xaaa", 1000.0), ("0xbbb", 500.0)][..],
    )]);
    holders.forced_count = Some(3);
    let (aggregator, _) = PipelineBuilder::new(holders).build();

    let err = aggregator
        .process(Chain::Optimism, &[Asset::Usdc], 300.0)
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<RewardError>(),
        Some(RewardError::Integrity { .. })
    ));
    assert!(format!("{err:#}").contains("usdc"));
}

#[tokio::test]
async fn test_no_qualifying_holders_is_an_empty_allocation() {
    let holders = InMemoryHolders::new(&[(
        Chain::Optimism,
        Asset::Usdc,
        &[("0xaaa", 1.0), ("0xbbb", 2.0)][..],
    )]);
    let (aggregator, _) = PipelineBuilder::new(holders).build();

    let err = aggregator
        .process(Chain::Optimism, &[Asset::Usdc], 300.0)
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<RewardError>(),
        Some(RewardError::EmptyAllocation)
    ));
}

#[tokio::test]
async fn test_short_price_history_aborts_volatile_asset() {
    let holders = InMemoryHolders::new(&[(
        Chain::Optimism,
        Asset::Weth,
        &[("0xaaa", 2.0)][..],
    )]);
    let (aggregator, _) = PipelineBuilder::new(holders)
        .prices(vec![2000.0, 2000.0])
        .build();

    let err = aggregator
        .process(Chain::Optimism, &[Asset::Weth], 300.0)
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<RewardError>(),
        Some(RewardError::DataUnavailable { .. })
    ));
}

#[tokio::test]
async fn test_equal_totals_rank_deterministically_by_address() {
    // equal holdings produce equal rewards; the exported order must not
    // depend on accumulation-map iteration order
    let holders = InMemoryHolders::new(&[(
        Chain::Optimism,
        Asset::Usdc,
        &[("0xzzz", 500.0), ("0xaaa", 500.0), ("0xmmm", 500.0)][..],
    )]);
    let (aggregator, _) = PipelineBuilder::new(holders).build();

    let ranked = aggregator
        .process(Chain::Optimism, &[Asset::Usdc], 300.0)
        .await
        .unwrap();

    let order: Vec<&str> = ranked.iter().map(|r| r.address.as_str()).collect();
    assert_eq!(order, vec!["0xaaa", "0xmmm", "0xzzz"]);
    assert!(ranked
        .iter()
        .all(|r| (r.total_reward - 100.0).abs() < 1e-9));
}

#[tokio::test]
async fn test_pagination_covers_the_full_holder_set() {
    // five holders with a page size of two: three pages
    let holders = InMemoryHolders::new(&[(
        Chain::Optimism,
        Asset::Usdc,
        &[
            ("0xa1", 100.0),
            ("0xa2", 200.0),
            ("0xa3", 300.0),
            ("0xa4", 400.0),
            ("0xa5", 500.0),
        ][..],
    )]);
    let (aggregator, _) = PipelineBuilder::new(holders).build();

    let ranked = aggregator
        .process(Chain::Optimism, &[Asset::Usdc], 1500.0)
        .await
        .unwrap();

    assert_eq!(ranked.len(), 5);
    let total: f64 = ranked.iter().map(|r| r.total_reward).sum();
    assert!((total - 1500.0).abs() < 1e-6);
    assert_eq!(ranked[0].address, "0xa5");
    assert_eq!(ranked[4].address, "0xa1");
}
