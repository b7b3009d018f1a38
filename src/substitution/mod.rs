//! Implementation of the topology substitution stage.
//!
//! ## Overview
//!
//! One driver invocation processes each registered node-kind strategy in
//! turn, and for each strategy runs these steps:
//!
//! 1. Configuration lookup - find the strategy's `MatchingConfiguration` in
//!    the execution context; when absent, report a diagnostic task and skip
//!    the strategy without touching the topology
//! 2. Candidate resolution - resolve every confirmed candidate id against
//!    the candidate map the matching stage left in the execution cache
//! 3. Snapshot - capture the matched node before replacement
//! 4. Replacement - dispatch on `is_service`: service resources go through
//!    the strategy's service hook, location-specific resources through the
//!    copy-in/merge/tag-preserve path
//! 5. Snapshot - capture the node after replacement
//! 6. Publication - publish both snapshot maps into the execution cache
//!    under the strategy's stage-specific keys
//!
//! Node-kind variation (which stage key, how services are linked, what runs
//! after a specific replacement) lives behind the `SubstitutionStrategy`
//! trait; the driver itself is kind-agnostic.

// Stage modules
pub mod driver;
pub mod kinds;
pub mod strategy;

pub use driver::SubstitutionDriver;
pub use kinds::{ComputeNodes, NetworkNodes, StorageNodes, SERVICE_ID_TAG};
pub use strategy::SubstitutionStrategy;

/// Outcome of one strategy within a driver invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// The strategy had a configuration and processed its substitutions
    Applied {
        /// Number of nodes replaced
        substituted: usize,
    },
    /// The strategy had no configuration and left the topology alone
    Skipped {
        /// Why the strategy was skipped
        reason: String,
    },
}

/// Per-strategy result of a driver invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    /// Stage key of the strategy this report belongs to
    pub stage: String,
    /// What the strategy did
    pub outcome: StageOutcome,
}

impl StageReport {
    /// Whether this stage applied its substitutions.
    pub fn is_applied(&self) -> bool {
        matches!(self.outcome, StageOutcome::Applied { .. })
    }
}
