//! Fatal error taxonomy for the reward pipeline.
//!
//! Every variant aborts processing of the current run. The one recoverable
//! failure mode, a per-address eligibility lookup error, is absorbed inside
//! `EligibilityChecker` (resolved to not-eligible and logged) and therefore
//! has no variant here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RewardError {
    /// The holder API returned a non-success response mid-pagination. No
    /// partial holder set is ever returned, since the integrity invariants
    /// cannot be verified against partial data.
    #[error("holder fetch for {contract} failed: {reason}")]
    Fetch { contract: String, reason: String },

    /// Duplicate address across pages, or the accumulated holder count does
    /// not match the authoritative count reported by the source.
    #[error("holder set integrity violated for {contract}: {reason}")]
    Integrity { contract: String, reason: String },

    /// The price source returned fewer samples than the moving-average
    /// window requires. Reward math depends on valid pricing, so there is
    /// no fallback price.
    #[error("price history for {series} too short: got {got} samples, need {need}")]
    DataUnavailable {
        series: String,
        got: usize,
        need: usize,
    },

    /// Allocation over an empty holder set or a zero total valuation.
    #[error("cannot allocate rewards over an empty or zero-value holder set")]
    EmptyAllocation,

    /// Base rewards summed past the budget beyond tolerance. This indicates
    /// a computation defect, not a data problem.
    #[error("allocated base rewards {allocated} exceed budget {budget} beyond tolerance")]
    Conservation { allocated: f64, budget: f64 },
}
