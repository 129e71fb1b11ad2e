//! Batch NFT eligibility resolution.
//!
//! One independent remote lookup per address, bounded by a concurrency
//! limit, with the batch blocking until every lookup settles. A failed or
//! timed-out lookup resolves to `false`: the boost is never granted on
//! uncertain data. This is the only place in the pipeline where partial
//! failure is tolerated, because eligibility affects only the boost, never
//! balances.

use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, instrument, warn};

use crate::remote::EligibilityProbe;

#[derive(Debug, Clone)]
pub struct EligibilityCheckerConfig {
    /// Maximum in-flight lookups.
    pub max_concurrent: usize,
    /// Per-lookup timeout; an expired lookup counts as a failure. The task
    /// is not cancelled, just ignored.
    pub lookup_timeout_secs: u64,
}

impl Default for EligibilityCheckerConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 10,
            lookup_timeout_secs: 10,
        }
    }
}

pub struct EligibilityChecker {
    probe: Arc<dyn EligibilityProbe>,
    config: EligibilityCheckerConfig,
}

impl EligibilityChecker {
    pub fn new(probe: Arc<dyn EligibilityProbe>, config: EligibilityCheckerConfig) -> Self {
        Self { probe, config }
    }

    /// Resolve the special flag for every address. Never fails: the result
    /// contains exactly one entry per input address, `false` wherever the
    /// lookup could not be completed.
    #[instrument(skip_all, fields(addresses = addresses.len()))]
    pub async fn check(&self, addresses: &[String]) -> HashMap<String, bool> {
        let lookup_timeout = Duration::from_secs(self.config.lookup_timeout_secs);

        let flags: HashMap<String, bool> = stream::iter(addresses)
            .map(|address| {
                let probe = Arc::clone(&self.probe);
                async move {
                    let eligible = match timeout(lookup_timeout, probe.is_eligible(address)).await
                    {
                        Ok(Ok(flag)) => flag,
                        Ok(Err(e)) => {
                            warn!(address = %address, error = %e, "eligibility lookup failed, treating as not eligible");
                            false
                        }
                        Err(_) => {
                            warn!(address = %address, "eligibility lookup timed out, treating as not eligible");
                            false
                        }
                    };
                    (address.clone(), eligible)
                }
            })
            .buffer_unordered(self.config.max_concurrent.max(1))
            .collect()
            .await;

        let special = flags.values().filter(|&&v| v).count();
        info!(special, total = flags.len(), "eligibility batch resolved");

        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;

    /// Eligible when the address ends in "e", errors when it ends in "x".
    struct SuffixProbe;

    #[async_trait]
    impl EligibilityProbe for SuffixProbe {
        async fn is_eligible(&self, address: &str) -> Result<bool> {
            if address.ends_with('x') {
                anyhow::bail!("transport error");
            }
            Ok(address.ends_with('e'))
        }
    }

    #[tokio::test]
    async fn test_one_entry_per_address_with_failures_closed() {
        let addresses: Vec<String> = vec!["0xae", "0xbx", "0xcc", "0xde"]
            .into_iter()
            .map(String::from)
            .collect();
        let checker =
            EligibilityChecker::new(Arc::new(SuffixProbe), EligibilityCheckerConfig::default());

        let flags = checker.check(&addresses).await;

        assert_eq!(flags.len(), addresses.len());
        assert!(flags["0xae"]);
        assert!(!flags["0xbx"], "failed lookup must resolve to false");
        assert!(!flags["0xcc"]);
        assert!(flags["0xde"]);
    }

    #[tokio::test]
    async fn test_timeout_resolves_to_false() {
        struct StalledProbe;

        #[async_trait]
        impl EligibilityProbe for StalledProbe {
            async fn is_eligible(&self, _address: &str) -> Result<bool> {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(true)
            }
        }

        let config = EligibilityCheckerConfig {
            max_concurrent: 2,
            lookup_timeout_secs: 1,
        };
        let checker = EligibilityChecker::new(Arc::new(StalledProbe), config);

        let addresses = vec!["0xaa".to_string(), "0xbb".to_string()];
        let flags = checker.check(&addresses).await;

        assert_eq!(flags.len(), 2);
        assert!(flags.values().all(|&v| !v));
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let checker =
            EligibilityChecker::new(Arc::new(SuffixProbe), EligibilityCheckerConfig::default());
        let flags = checker.check(&[]).await;
        assert!(flags.is_empty());
    }
}
