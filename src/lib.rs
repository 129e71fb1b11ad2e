//! Cross-chain LP holder reward distribution engine.
//!
//! Aggregates LP token-holder balances from a paginated indexer, values
//! them in USD (moving-average pricing for volatile assets), resolves a
//! per-holder NFT boost flag concurrently, and computes a budget-conserving
//! weighted reward allocation merged across assets into one ranked payout
//! list.

pub mod aggregator;
pub mod allocator;
pub mod config;
pub mod eligibility;
pub mod error;
pub mod holders;
pub mod price;
pub mod registry;
pub mod remote;
pub mod types;
pub mod utils;

// Re-export the pipeline surface for convenience
pub use aggregator::{AggregatorConfig, RewardAggregator};
pub use allocator::{RewardAllocator, CONSERVATION_TOLERANCE};
pub use config::RewardsConfig;
pub use eligibility::{EligibilityChecker, EligibilityCheckerConfig};
pub use error::RewardError;
pub use holders::{HolderFetcher, HolderFetcherConfig};
pub use price::PriceOracle;
pub use types::{
    Asset, Chain, EligibleHolder, HolderBalance, RankedReward, RewardRecord, ValuedHolder,
};
