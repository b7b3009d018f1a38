//! Node-kind extension points of the substitution algorithm.
//!
//! The driver owns the algorithm; everything that varies per node kind is
//! collected in the `SubstitutionStrategy` trait. A strategy names its
//! stage (which keys its configuration and cache entries), decides how a
//! node is linked to an externally managed service, and gets a finishing
//! hook after each specific-resource replacement. The defaults make a
//! minimal strategy a one-method implementation.

use std::collections::BTreeSet;

use crate::catalog::TypeKind;
use crate::error::Result;
use crate::resources::ResourceStore;
use crate::template::{Template, Topology};

/// Per-node-kind behavior of the substitution stage.
///
/// Implementations must be stateless or internally synchronized; one
/// strategy instance serves every substitution of its kind in a run.
pub trait SubstitutionStrategy: Send + Sync {
    /// Stable name of this stage.
    ///
    /// Keys the strategy's matching configuration in the execution context
    /// and prefixes its execution cache entries.
    fn stage_key(&self) -> &str;

    /// Catalog namespace candidate types are resolved in.
    fn type_kind(&self) -> TypeKind {
        TypeKind::Node
    }

    /// Cache key the candidate map is read from.
    fn candidates_cache_key(&self) -> String {
        format!("{}.candidates", self.stage_key())
    }

    /// Cache key the before-substitution snapshot is published under.
    fn original_cache_key(&self) -> String {
        format!("{}.original", self.stage_key())
    }

    /// Cache key the after-substitution snapshot is published under.
    fn replaced_cache_key(&self) -> String {
        format!("{}.replaced", self.stage_key())
    }

    /// Replace a matched node with a link to an externally managed service.
    ///
    /// Called instead of the specific-resource path when the confirmed
    /// candidate is a service. The node at `node_id` is guaranteed to exist
    /// when this runs. The default does nothing: kinds that cannot be
    /// backed by services leave the node as it was, and the driver still
    /// snapshots it.
    fn replace_service(
        &self,
        _topology: &mut Topology,
        _node_id: &str,
        _service_id: &str,
        _store: &dyn ResourceStore,
    ) -> Result<()> {
        Ok(())
    }

    /// Finishing hook of a specific-resource replacement.
    ///
    /// Runs after the replacement template has its merged properties and
    /// preserved name/tags, just before it is swapped into the topology.
    /// `shadowed` already holds the keys the property merge kept out;
    /// implementations that merge further state append to it.
    fn finish_specific(
        &self,
        _replacement: &mut Template,
        _displaced: &Template,
        _shadowed: &mut BTreeSet<String>,
    ) {
    }
}
