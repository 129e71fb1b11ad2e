//! Weighted reward allocation for a single asset batch.
//!
//! Every holder receives a share of the batch budget proportional to its
//! USD valuation. Base rewards are checked against the budget before the
//! boost is applied, so a batch with many special holders can legitimately
//! pay out more than its nominal budget share.

use std::cmp::Ordering;

use crate::error::RewardError;
use crate::types::{EligibleHolder, RewardRecord};

/// Relative overshoot allowed on the base-reward sum before the batch is
/// rejected as a computation defect.
pub const CONSERVATION_TOLERANCE: f64 = 1e-8;

#[derive(Debug, Clone)]
pub struct RewardAllocator {
    tolerance: f64,
}

impl Default for RewardAllocator {
    fn default() -> Self {
        Self {
            tolerance: CONSERVATION_TOLERANCE,
        }
    }
}

impl RewardAllocator {
    /// Allocate `budget` across `holders` by valuation weight, boosting
    /// special holders by `boost_factor` after the conservation check.
    ///
    /// Records are returned descending by `usd_value`; holders with equal
    /// valuations keep their input order.
    pub fn allocate(
        &self,
        holders: &[EligibleHolder],
        budget: f64,
        boost_factor: f64,
    ) -> Result<Vec<RewardRecord>, RewardError> {
        let total_usd: f64 = holders.iter().map(|h| h.usd_value).sum();
        if holders.is_empty() || total_usd <= 0.0 {
            return Err(RewardError::EmptyAllocation);
        }

        let mut ordered: Vec<&EligibleHolder> = holders.iter().collect();
        ordered.sort_by(|a, b| {
            b.usd_value
                .partial_cmp(&a.usd_value)
                .unwrap_or(Ordering::Equal)
        });

        let mut records = Vec::with_capacity(ordered.len());
        let mut allocated = 0.0;
        for holder in &ordered {
            let weighted_score = holder.usd_value / total_usd;
            let base_reward = weighted_score * budget;
            allocated += base_reward;
            records.push(RewardRecord {
                address: holder.address.clone(),
                weighted_score,
                base_reward,
                final_reward: base_reward,
            });
        }

        if allocated > budget * (1.0 + self.tolerance) {
            return Err(RewardError::Conservation { allocated, budget });
        }

        // boost strictly after the conservation check; the boosted batch
        // total may exceed the nominal budget share
        for (holder, record) in ordered.iter().zip(records.iter_mut()) {
            if holder.is_special {
                record.final_reward = record.base_reward * boost_factor;
            }
        }

        Ok(records)
    }
}
