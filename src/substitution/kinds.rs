//! Shipped node-kind strategies.
//!
//! `ComputeNodes` carries the two non-default behaviors: compute nodes can
//! be backed by externally managed services, and their capabilities get
//! property reconciliation after a specific replacement. `NetworkNodes` and
//! `StorageNodes` keep the trait defaults; they exist so hosting systems
//! can confirm matches for those kinds under their own stage keys.

use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::merge::merge_properties;
use crate::resources::ResourceStore;
use crate::substitution::strategy::SubstitutionStrategy;
use crate::template::{Tag, Template, Topology};

/// Tag appended to a node that was linked to an externally managed service,
/// carrying the service id for downstream stages
pub const SERVICE_ID_TAG: &str = "substitution.service-id";

/// Substitution strategy for compute nodes
#[derive(Debug, Clone, Copy, Default)]
pub struct ComputeNodes;

impl SubstitutionStrategy for ComputeNodes {
    fn stage_key(&self) -> &str {
        "ComputeNodes"
    }

    /// Swap the node for a fresh copy of the service's template.
    ///
    /// The displaced node's `name` and `tags` are preserved and a
    /// [`SERVICE_ID_TAG`] tag is appended. Properties are not merged: an
    /// externally managed service's property set is authoritative.
    fn replace_service(
        &self,
        topology: &mut Topology,
        node_id: &str,
        service_id: &str,
        store: &dyn ResourceStore,
    ) -> Result<()> {
        let displaced = topology
            .node(node_id)
            .ok_or_else(|| Error::TemplateNotFound {
                template_id: node_id.to_string(),
                stage: self.stage_key().to_string(),
            })?;

        let mut service = store.fresh_template(service_id)?;
        service.name = displaced.name.clone();
        service.tags = displaced.tags.clone();
        service.tags.push(Tag::new(SERVICE_ID_TAG, service_id));

        topology.replace_existing(node_id, service);
        Ok(())
    }

    /// Reconcile capability properties.
    ///
    /// For every capability name present on both nodes, the displaced
    /// capability's properties are merged into the replacement capability's
    /// properties under the usual rules: the replacement wins, the topology
    /// fills gaps, and newly shadowed keys join the substitution's set.
    /// Capabilities only one side has are left alone.
    fn finish_specific(
        &self,
        replacement: &mut Template,
        displaced: &Template,
        shadowed: &mut BTreeSet<String>,
    ) {
        for (name, displaced_capability) in &displaced.capabilities {
            if let Some(capability) = replacement.capabilities.get_mut(name) {
                let target = std::mem::take(&mut capability.properties);
                let merged = merge_properties(&displaced_capability.properties, target, true);
                capability.properties = merged.properties.unwrap_or_default();
                shadowed.extend(merged.shadowed);
            }
        }
    }
}

/// Substitution strategy for network nodes
#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkNodes;

impl SubstitutionStrategy for NetworkNodes {
    fn stage_key(&self) -> &str {
        "NetworkNodes"
    }
}

/// Substitution strategy for storage nodes
#[derive(Debug, Clone, Copy, Default)]
pub struct StorageNodes;

impl SubstitutionStrategy for StorageNodes {
    fn stage_key(&self) -> &str {
        "StorageNodes"
    }
}
