//! Stage contract for topology-rewriting pipeline members
//!
//! A deployment flow runs a sequence of modifiers over one topology, each
//! reading and writing the shared execution context. This module defines
//! that contract and a sequential runner; the hosting system decides which
//! modifiers run and in what order.

use crate::context::ExecutionContext;
use crate::error::Result;
use crate::substitution::SubstitutionDriver;
use crate::template::Topology;

/// One stage of a topology-rewriting pipeline.
///
/// Implementations mutate the topology in place and communicate with other
/// stages only through the execution context (configurations, cache entries,
/// diagnostic tasks).
pub trait TopologyModifier: Send + Sync {
    /// Stable stage name, used in logs and diagnostics.
    fn name(&self) -> &str;

    /// Rewrite the topology for this stage.
    fn process(&self, topology: &mut Topology, context: &mut ExecutionContext) -> Result<()>;
}

impl TopologyModifier for SubstitutionDriver {
    fn name(&self) -> &str {
        "substitution"
    }

    fn process(&self, topology: &mut Topology, context: &mut ExecutionContext) -> Result<()> {
        self.apply(topology, context)?;
        Ok(())
    }
}

/// Run modifiers in order over one topology.
///
/// Stops at the first failing stage; earlier stages' rewrites and context
/// entries remain in place, which lets a caller inspect how far the run got.
pub fn execute_stages(
    modifiers: &[Box<dyn TopologyModifier>],
    topology: &mut Topology,
    context: &mut ExecutionContext,
) -> Result<()> {
    for modifier in modifiers {
        modifier.process(topology, context)?;
    }
    Ok(())
}
