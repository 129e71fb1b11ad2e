//! Paginated holder-set retrieval with integrity verification.
//!
//! Pages are fetched strictly sequentially (each continuation token comes
//! from the previous page) and paced by a rate limiter. Two invariants are
//! enforced while accumulating: no address may appear twice anywhere in the
//! unpaginated set, and the accumulated total must match the authoritative
//! count the source reports. Either violation, or any failed page request,
//! aborts the fetch without returning partial data.

use governor::{Quota, RateLimiter};
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::error::RewardError;
use crate::remote::HolderSource;
use crate::types::Chain;

#[derive(Debug, Clone)]
pub struct HolderFetcherConfig {
    /// Page requests per minute while paginating.
    pub rate_limit_per_minute: u32,
}

impl Default for HolderFetcherConfig {
    fn default() -> Self {
        Self {
            rate_limit_per_minute: 30,
        }
    }
}

pub struct HolderFetcher {
    source: Arc<dyn HolderSource>,
    rate_limiter: Arc<
        RateLimiter<
            governor::state::direct::NotKeyed,
            governor::state::InMemoryState,
            governor::clock::DefaultClock,
        >,
    >,
}

impl HolderFetcher {
    pub fn new(source: Arc<dyn HolderSource>, config: HolderFetcherConfig) -> Self {
        let per_minute = NonZeroU32::new(config.rate_limit_per_minute.max(1))
            .expect("rate limit is clamped to at least 1");
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_minute(per_minute)));

        Self {
            source,
            rate_limiter,
        }
    }

    /// Retrieve the complete deduplicated holder map for a token contract,
    /// then keep only entries with `balance >= min_balance`.
    #[instrument(skip(self), fields(%chain, contract = contract_address))]
    pub async fn fetch(
        &self,
        chain: Chain,
        contract_address: &str,
        min_balance: f64,
    ) -> Result<HashMap<String, f64>, RewardError> {
        let mut holders: HashMap<String, f64> = HashMap::new();
        let mut page_token: Option<String> = None;
        let mut expected_count: Option<usize> = None;
        let mut pages = 0usize;

        loop {
            self.rate_limiter.until_ready().await;

            let page = self
                .source
                .list_holders(contract_address, page_token.as_deref())
                .await
                .map_err(|e| RewardError::Fetch {
                    contract: contract_address.to_string(),
                    reason: format!("{e:#}"),
                })?;
            pages += 1;

            // the first page's reported total is authoritative
            if expected_count.is_none() {
                expected_count = Some(page.holder_count);
            }

            for holder in page.holders {
                if holders.insert(holder.address.clone(), holder.balance).is_some() {
                    return Err(RewardError::Integrity {
                        contract: contract_address.to_string(),
                        reason: format!("address {} appears twice", holder.address),
                    });
                }
            }

            debug!(pages, accumulated = holders.len(), "holder page processed");

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        let expected = expected_count.unwrap_or(0);
        if holders.len() != expected {
            return Err(RewardError::Integrity {
                contract: contract_address.to_string(),
                reason: format!(
                    "accumulated {} holders but source reports {expected}",
                    holders.len()
                ),
            });
        }

        let total = holders.len();
        let filtered: HashMap<String, f64> = holders
            .into_iter()
            .filter(|(_, balance)| *balance >= min_balance)
            .collect();

        info!(
            %chain,
            contract = contract_address,
            pages,
            total,
            kept = filtered.len(),
            min_balance,
            "holder set retrieved and filtered"
        );

        Ok(filtered)
    }
}
